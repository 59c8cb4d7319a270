//! CSV alignment parser.
//!
//! The first row is a header. The identifier column is the one named
//! `id` or `name`, the residue column the one named `sequence` or `seq`
//! (case-insensitive). When only one of them is named, the other is the
//! first remaining column. Without recognisable names, the first two
//! columns are used in that order.
//!
//! ```text
//! id,sequence
//! seq1,ACGT-ACGT
//! seq2,ACGTTACGT
//! ```

use thiserror::Error;

use crate::model::{Alignment, Sequence};

/// Errors that can occur during CSV parsing.
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Empty CSV file")]
    EmptyFile,

    #[error("Expected at least two columns (identifier and sequence), found {0}")]
    TooFewColumns(usize),

    #[error("Row {0} has no sequence identifier")]
    EmptyIdentifier(usize),

    #[error("Malformed CSV: {0}")]
    Malformed(#[from] ::csv::Error),
}

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

fn find_column(headers: &::csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

/// First column index other than `taken`.
fn first_other(taken: usize) -> usize {
    if taken == 0 {
        1
    } else {
        0
    }
}

/// Parses CSV content from a string.
pub fn parse_csv_str(content: &str) -> CsvResult<Alignment> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(CsvError::TooFewColumns(headers.len()));
    }

    let (id_idx, seq_idx) = match (
        find_column(&headers, &["id", "name"]),
        find_column(&headers, &["sequence", "seq"]),
    ) {
        (Some(i), Some(s)) => (i, s),
        (Some(i), None) => (i, first_other(i)),
        (None, Some(s)) => (first_other(s), s),
        (None, None) => (0, 1),
    };

    let mut sequences = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        // Data rows are numbered from 1, after the header
        let row = row + 1;
        let id = record.get(id_idx).unwrap_or("");
        if id.is_empty() {
            return Err(CsvError::EmptyIdentifier(row));
        }
        let residues: String = record
            .get(seq_idx)
            .unwrap_or("")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if residues.is_empty() {
            continue;
        }
        sequences.push(Sequence::new(id, residues));
    }

    if sequences.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    Ok(Alignment::new(sequences))
}
