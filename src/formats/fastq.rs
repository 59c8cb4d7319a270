//! FASTQ parser.
//!
//! Each record spans exactly four lines:
//!
//! ```text
//! @read_identifier optional description
//! ACGTACGT
//! +
//! IIIIHHHH
//! ```
//!
//! Quality strings are validated against the residue length and then
//! discarded: difference plots only use residues.

use thiserror::Error;

use crate::model::{Alignment, Sequence};

/// Errors that can occur during FASTQ parsing.
#[derive(Error, Debug)]
pub enum FastqError {
    #[error("Empty FASTQ file")]
    EmptyFile,

    #[error("Expected '@' header at line {0}")]
    MissingHeader(usize),

    #[error("Empty sequence identifier at line {0}")]
    EmptyIdentifier(usize),

    #[error("Expected '+' separator at line {0}")]
    MissingSeparator(usize),

    #[error("Truncated record '{0}' at end of file")]
    TruncatedRecord(String),

    #[error("Record '{id}' has {residues} residues but {qualities} quality scores")]
    QualityLengthMismatch {
        id: String,
        residues: usize,
        qualities: usize,
    },
}

/// Result type for FASTQ operations.
pub type FastqResult<T> = Result<T, FastqError>;

/// Parses FASTQ content from a string.
pub fn parse_fastq_str(content: &str) -> FastqResult<Alignment> {
    let mut sequences = Vec::new();
    // Blank lines only appear between records
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    while let Some((line_number, header)) = lines.next() {
        let header = header
            .strip_prefix('@')
            .ok_or(FastqError::MissingHeader(line_number))?;
        let id = header.split_whitespace().next().unwrap_or("");
        if id.is_empty() {
            return Err(FastqError::EmptyIdentifier(line_number));
        }

        let (_, residues) = lines
            .next()
            .ok_or_else(|| FastqError::TruncatedRecord(id.to_string()))?;
        let (sep_line, separator) = lines
            .next()
            .ok_or_else(|| FastqError::TruncatedRecord(id.to_string()))?;
        if !separator.starts_with('+') {
            return Err(FastqError::MissingSeparator(sep_line));
        }
        let (_, qualities) = lines
            .next()
            .ok_or_else(|| FastqError::TruncatedRecord(id.to_string()))?;

        if qualities.len() != residues.len() {
            return Err(FastqError::QualityLengthMismatch {
                id: id.to_string(),
                residues: residues.len(),
                qualities: qualities.len(),
            });
        }

        sequences.push(Sequence::new(id, residues));
    }

    if sequences.is_empty() {
        return Err(FastqError::EmptyFile);
    }

    Ok(Alignment::new(sequences))
}
