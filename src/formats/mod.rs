//! Multi-format sequence file parser.
//!
//! Supports:
//! - FASTA (.fa, .fas, .fasta)
//! - FASTQ (.fq, .fastq)
//! - CSV (.csv) with an identifier and a sequence column
//!
//! The format is never guessed from content here: the caller passes the
//! `DataType` carried by the Data record (explicit or inferred from the
//! file extension).

pub mod csv;
pub mod fasta;
pub mod fastq;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::model::{Alignment, DataType};

/// Errors that can occur during file parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty file")]
    EmptyFile,

    #[error("FASTA error: {0}")]
    FastaError(#[from] fasta::FastaError),

    #[error("FASTQ error: {0}")]
    FastqError(#[from] fastq::FastqError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::CsvError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses content with a specific format.
pub fn parse_content(content: &str, format: DataType) -> ParseResult<Alignment> {
    match format {
        DataType::Fasta => fasta::parse_fasta_str(content).map_err(ParseError::FastaError),
        DataType::Fastq => fastq::parse_fastq_str(content).map_err(ParseError::FastqError),
        DataType::Csv => csv::parse_csv_str(content).map_err(ParseError::CsvError),
    }
}

/// Parses a sequence file as `format`.
pub fn parse_file<P: AsRef<Path>>(path: P, format: DataType) -> ParseResult<Alignment> {
    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    let file_size = metadata.len() as usize;

    if file_size == 0 {
        return Err(ParseError::EmptyFile);
    }

    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;

    parse_content(&content, format)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_content_dispatch() {
        let fa = parse_content(">s1\nACGT\n", DataType::Fasta).unwrap();
        assert_eq!(fa.get(0).unwrap().id, "s1");

        let fq = parse_content("@r1\nACGT\n+\nIIII\n", DataType::Fastq).unwrap();
        assert_eq!(fq.get(0).unwrap().as_str(), "ACGT");

        let csv = parse_content("id,sequence\nx,TTTT\n", DataType::Csv).unwrap();
        assert_eq!(csv.get(0).unwrap().id, "x");
    }

    #[test]
    fn test_wrong_format_fails() {
        let result = parse_content(">s1\nACGT\n", DataType::Fastq);
        assert!(matches!(result, Err(ParseError::FastqError(_))));
    }

    #[test]
    fn test_parse_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = parse_file(file.path(), DataType::Fasta);
        assert!(matches!(result, Err(ParseError::EmptyFile)));
    }

    #[test]
    fn test_parse_file_on_disk() {
        let mut file = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        write!(file, ">a\nAC\nGT\n>b\nACGA\n").unwrap();
        let alignment = parse_file(file.path(), DataType::Fasta).unwrap();
        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.get(0).unwrap().as_str(), "ACGT");
    }
}
