//! FASTA parser.
//!
//! ```text
//! >sequence_identifier optional description
//! ACGT-ACGT
//! ACGT
//! >another_sequence
//! TGCA-TGCA
//! TGCA
//! ```
//!
//! The identifier is the first whitespace-delimited token of the header.
//! Residue lines are concatenated and blank lines are ignored. Records
//! with a header but no residues are dropped.

use thiserror::Error;

use crate::model::{Alignment, Sequence};

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Empty sequence identifier at line {0}")]
    EmptyIdentifier(usize),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Parses FASTA content from a string.
pub fn parse_fasta_str(content: &str) -> FastaResult<Alignment> {
    let mut sequences = Vec::new();
    let mut current_id: Option<&str> = None;
    let mut current_seq: Vec<u8> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(id) = current_id.take() {
                if !current_seq.is_empty() {
                    sequences.push(Sequence::from_bytes(id, std::mem::take(&mut current_seq)));
                }
            }

            let id = header.split_whitespace().next().unwrap_or("");
            if id.is_empty() {
                return Err(FastaError::EmptyIdentifier(line_number));
            }
            current_id = Some(id);
            current_seq.clear();
        } else {
            if current_id.is_none() {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            }
            // Most lines carry no internal whitespace
            if line.bytes().all(|b| !b.is_ascii_whitespace()) {
                current_seq.extend_from_slice(line.as_bytes());
            } else {
                current_seq.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
            }
        }
    }

    if let Some(id) = current_id {
        if !current_seq.is_empty() {
            sequences.push(Sequence::from_bytes(id, current_seq));
        }
    }

    if sequences.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    Ok(Alignment::new(sequences))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fasta() {
        let alignment = parse_fasta_str(">seq1\nACGT\n>seq2\nTGCA\n").unwrap();

        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.get(0).unwrap().id, "seq1");
        assert_eq!(alignment.get(0).unwrap().as_str(), "ACGT");
        assert_eq!(alignment.get(1).unwrap().id, "seq2");
        assert_eq!(alignment.get(1).unwrap().as_str(), "TGCA");
    }

    #[test]
    fn test_parse_multiline_with_gaps() {
        let alignment = parse_fasta_str(">seq1 description here\nAC-T\nTG A\n\nAA\n").unwrap();

        assert_eq!(alignment.sequence_count(), 1);
        assert_eq!(alignment.get(0).unwrap().id, "seq1");
        assert_eq!(alignment.get(0).unwrap().as_str(), "AC-TTGAAA");
    }

    #[test]
    fn test_header_without_residues_dropped() {
        let alignment = parse_fasta_str(">empty\n>seq2\nTGCA\n").unwrap();
        assert_eq!(alignment.sequence_count(), 1);
        assert_eq!(alignment.get(0).unwrap().id, "seq2");
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_fasta_str(""), Err(FastaError::EmptyFile)));
        assert!(matches!(parse_fasta_str("\n\n"), Err(FastaError::EmptyFile)));
    }

    #[test]
    fn test_sequence_without_header() {
        let result = parse_fasta_str("ACGT\n>seq1\nTGCA\n");
        assert!(matches!(result, Err(FastaError::SequenceWithoutHeader(1))));
    }

    #[test]
    fn test_empty_identifier() {
        let result = parse_fasta_str(">seq1\nACGT\n>  \nTGCA\n");
        assert!(matches!(result, Err(FastaError::EmptyIdentifier(3))));
    }

    #[test]
    fn test_case_preserved() {
        let alignment = parse_fasta_str(">seq1\nacgt\n").unwrap();
        assert_eq!(alignment.get(0).unwrap().as_str(), "acgt");
    }
}
