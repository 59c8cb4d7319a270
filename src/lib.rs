//! # seqhighlight - Highlighter plot preparation
//!
//! Imports FASTA, FASTQ and CSV alignments into named in-memory sessions
//! and computes the state behind Highlighter-style difference plots.
//!
//! ## Architecture
//!
//! - `model`: sequences, alignments, datatype and seqtype enums
//! - `formats`: FASTA, FASTQ and CSV parsers
//! - `data`: the Data record (one imported file and its derived state)
//! - `highlight`: variant compression, sampling and difference matrix
//! - `session`: named sessions and the registry holding them
//! - `import`: single-file, directory and batch import
//! - `error`: crate-wide error type
//!
//! ## Example
//!
//! ```no_run
//! use seqhighlight::import::{import_many, ImportOptions};
//! use seqhighlight::session::SessionRegistry;
//!
//! let mut registry = SessionRegistry::new();
//! let batch = import_many(
//!     &mut registry,
//!     &["data/a.fasta", "data/b.fastq"],
//!     &ImportOptions::new(),
//!     "s1",
//! );
//! println!("{} records in session s1", batch.session.len());
//! ```

pub mod data;
pub mod error;
pub mod formats;
pub mod highlight;
pub mod import;
pub mod model;
pub mod session;

pub use error::{Error, Result};
