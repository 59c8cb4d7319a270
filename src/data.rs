//! The Data record: one imported sequence file and its derived state.
//!
//! A record is created empty by [`Data::new`], which only validates its
//! arguments. Residues are parsed on demand by [`Data::load`], and the
//! Highlighter state (`compressed`, `sample`, `master`, `seq_diff`) is
//! filled in by the methods below as the plotting side needs it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::formats;
use crate::highlight::{self, Compressed, DiffMatrix, Master, Sample};
use crate::model::{Alignment, DataType, SeqType};

/// One imported sequence file.
#[derive(Debug, Clone)]
pub struct Data {
    path: PathBuf,
    datatype: DataType,
    seqtype: SeqType,
    loaded: bool,
    /// Parsed sequences, in file order
    pub raw_seq: Alignment,
    /// Deduplicated variants
    pub compressed: Compressed,
    /// Random subset of `compressed`
    pub sample: Sample,
    /// Reference residues for the difference matrix (empty until set)
    pub master: String,
    /// Per-variant comparison with `master`
    pub seq_diff: Option<DiffMatrix>,
}

impl Data {
    /// Creates an empty record for `path`.
    ///
    /// The datatype is inferred from the file extension when not given,
    /// and the seqtype defaults to nucleotide. The file must exist but is
    /// not opened.
    pub fn new<P: AsRef<Path>>(
        path: P,
        datatype: Option<DataType>,
        seqtype: Option<SeqType>,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let datatype = match datatype {
            Some(dt) => dt,
            None => DataType::from_path(path)?,
        };

        Ok(Self {
            path: path.to_path_buf(),
            datatype,
            seqtype: seqtype.unwrap_or_default(),
            loaded: false,
            raw_seq: Alignment::default(),
            compressed: Compressed::default(),
            sample: Sample::default(),
            master: String::new(),
            seq_diff: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn seqtype(&self) -> SeqType {
        self.seqtype
    }

    /// Returns true once `raw_seq` has been parsed from the file.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Parses the file into `raw_seq` if not already done.
    pub fn load(&mut self) -> Result<&Alignment> {
        if !self.loaded {
            self.reload()?;
        }
        Ok(&self.raw_seq)
    }

    /// Parses the file again, discarding all derived state.
    pub fn reload(&mut self) -> Result<&Alignment> {
        let alignment = formats::parse_file(&self.path, self.datatype).map_err(|source| {
            Error::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(warning) = &alignment.warning {
            warn!("{}: {}", self.path.display(), warning);
        }
        debug!(
            "Loaded {} sequences from {} ({}, {})",
            alignment.sequence_count(),
            self.path.display(),
            self.datatype,
            self.seqtype
        );

        self.raw_seq = alignment;
        self.loaded = true;
        self.compressed = Compressed::default();
        self.sample = Sample::default();
        self.master.clear();
        self.seq_diff = None;
        Ok(&self.raw_seq)
    }

    /// Deduplicates `raw_seq` into `compressed`, loading the file first if needed.
    pub fn compress(&mut self) -> Result<&Compressed> {
        self.load()?;
        self.compressed = highlight::compress(&self.raw_seq);
        self.sample = Sample::default();
        self.seq_diff = None;
        Ok(&self.compressed)
    }

    /// Draws `size` variants into `sample`, compressing first if needed.
    ///
    /// A size of zero is rejected: an empty sample means "no sample drawn".
    pub fn sample(&mut self, size: usize, seed: u64) -> Result<&Sample> {
        if size == 0 {
            return Err(Error::InvalidArgument("sample size must be at least 1".to_string()));
        }
        if self.compressed.is_empty() {
            self.compress()?;
        }
        self.sample = highlight::sample_variants(&self.compressed, size, seed);
        self.seq_diff = None;
        Ok(&self.sample)
    }

    /// Chooses the master sequence, loading the file first if needed.
    ///
    /// The load happens before the master is stored, so a later lazy load
    /// cannot discard it.
    pub fn set_master(&mut self, master: Master) -> Result<&str> {
        self.load()?;
        let residues = match master {
            Master::Residues(residues) => residues,
            Master::First => {
                self.raw_seq
                    .get(0)
                    .map(|s| s.data.clone())
                    .ok_or_else(|| {
                        Error::InvalidArgument(format!(
                            "{} holds no sequence to use as master",
                            self.path.display()
                        ))
                    })?
            }
            Master::Id(id) => {
                self.raw_seq.find(&id).map(|s| s.data.clone()).ok_or_else(|| {
                    Error::NotFound(format!(
                        "sequence '{}' in {}",
                        id,
                        self.path.display()
                    ))
                })?
            }
        };

        if residues.is_empty() {
            return Err(Error::InvalidArgument("master sequence is empty".to_string()));
        }
        self.master = residues;
        self.seq_diff = None;
        Ok(&self.master)
    }

    /// Builds `seq_diff` against `master`.
    ///
    /// Rows come from `sample` when one was drawn, otherwise from
    /// `compressed`.
    pub fn compute_diff(&mut self) -> Result<&DiffMatrix> {
        if self.master.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "no master sequence set for {}",
                self.path.display()
            )));
        }
        let variants = if !self.sample.is_empty() {
            &self.sample.variants[..]
        } else if !self.compressed.is_empty() {
            self.compressed.variants()
        } else {
            return Err(Error::InvalidArgument(format!(
                "{} has not been compressed",
                self.path.display()
            )));
        };

        let matrix = highlight::diff(&self.master, variants);
        Ok(&*self.seq_diff.insert(matrix))
    }
}
