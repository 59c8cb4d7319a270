//! seqhighlight - import alignments and summarise their Highlighter state.
//!
//! ## Usage
//!
//! ```bash
//! seqhighlight alignments/                 # every file in a directory
//! seqhighlight a.fasta b.fastq -n s1       # explicit files, named session
//! seqhighlight -d csv -s amino_acid x.txt  # force datatype and seqtype
//! seqhighlight --sample 20 --seed 7 -m ref a.fasta
//! ```
//!
//! ## Supported Formats
//!
//! - FASTA (.fa, .fas, .fasta)
//! - FASTQ (.fq, .fastq)
//! - CSV (.csv)

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use seqhighlight::data::Data;
use seqhighlight::highlight::Master;
use seqhighlight::import::{import_many, ImportOptions};
use seqhighlight::model::{DataType, SeqType};
use seqhighlight::session::{SessionRegistry, DEFAULT_SESSION};

/// Datatype override for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DatatypeArg {
    /// FASTA format
    Fasta,
    /// FASTQ format
    Fastq,
    /// CSV with id and sequence columns
    Csv,
}

impl From<DatatypeArg> for DataType {
    fn from(arg: DatatypeArg) -> Self {
        match arg {
            DatatypeArg::Fasta => DataType::Fasta,
            DatatypeArg::Fastq => DataType::Fastq,
            DatatypeArg::Csv => DataType::Csv,
        }
    }
}

/// Seqtype override for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeqtypeArg {
    /// DNA or RNA residues
    Nucleotide,
    /// Protein residues
    #[value(name = "amino_acid")]
    AminoAcid,
}

impl From<SeqtypeArg> for SeqType {
    fn from(arg: SeqtypeArg) -> Self {
        match arg {
            SeqtypeArg::Nucleotide => SeqType::Nucleotide,
            SeqtypeArg::AminoAcid => SeqType::AminoAcid,
        }
    }
}

/// seqhighlight - Import sequence alignments and compare them to a master sequence
///
/// Imports the given files (or every file of a single directory) into a
/// session, then prints, per file, the number of sequences, distinct
/// variants and columns differing from the master sequence.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to import, or a single directory
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Force a datatype for every file (default: from the extension)
    #[arg(short = 'd', long = "datatype", value_enum)]
    datatype: Option<DatatypeArg>,

    /// Residue type for every file
    #[arg(short = 's', long = "seqtype", value_enum, default_value = "nucleotide")]
    seqtype: SeqtypeArg,

    /// Session name
    #[arg(short = 'n', long = "session", default_value = DEFAULT_SESSION)]
    session: String,

    /// Re-import paths already present in the session
    #[arg(long = "force")]
    force: bool,

    /// Keep at most this many variants per file
    #[arg(long = "sample")]
    sample: Option<usize>,

    /// Seed for variant sampling
    #[arg(long = "seed", default_value = "0")]
    seed: u64,

    /// Identifier of the master sequence (default: first sequence)
    #[arg(short = 'm', long = "master")]
    master: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Loads one record and builds its difference matrix.
fn prepare(data: &mut Data, args: &Args) -> seqhighlight::Result<()> {
    data.compress()?;
    if let Some(size) = args.sample {
        data.sample(size, args.seed)?;
    }
    let master = match &args.master {
        Some(id) => Master::Id(id.clone()),
        None => Master::First,
    };
    data.set_master(master)?;
    data.compute_diff()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("seqhighlight=debug,info")
        } else {
            EnvFilter::new("seqhighlight=warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    let options = ImportOptions {
        datatype: args.datatype.map(DataType::from),
        seqtype: Some(args.seqtype.into()),
        force: args.force,
    };

    let mut registry = SessionRegistry::new();
    let failed = import_many(&mut registry, &args.paths, &options, &args.session)
        .failures()
        .count();

    let session = registry.get_mut(&args.session)?;
    if session.is_empty() {
        anyhow::bail!("No file could be imported ({} failed)", failed);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "path\tdatatype\tseqtype\tsequences\tvariants\trows\tvariable_columns")?;
    for data in session.records_mut() {
        if let Err(e) = prepare(data, &args) {
            warn!("{}", e);
            continue;
        }
        let variable = data
            .seq_diff
            .as_ref()
            .map(|m| (m.rows.len(), m.variable_columns().len()))
            .unwrap_or((0, 0));
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            data.path().display(),
            data.datatype(),
            data.seqtype(),
            data.raw_seq.sequence_count(),
            data.compressed.len(),
            variable.0,
            variable.1
        )?;
    }

    Ok(())
}
