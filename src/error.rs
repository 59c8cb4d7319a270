//! Crate-wide error type.
//!
//! Format parsers have their own error enums (see [`crate::formats`]); they
//! are folded into [`Error::Parse`] when they surface through a Data record.

use std::path::PathBuf;

use thiserror::Error;

use crate::formats::ParseError;

/// Errors raised by record construction, session and import operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported format '{0}' (expected one of: fa, fas, fasta, fq, fastq, csv)")]
    UnsupportedFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for session and import operations.
pub type Result<T> = std::result::Result<T, Error>;
