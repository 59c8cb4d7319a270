//! Sequence data model.
//!
//! This module contains the plain data types shared by the parsers, the
//! Data record and the Highlighter computations:
//! - `Sequence` and `Alignment`
//! - `DataType`: the input file format of a record
//! - `SeqType`: nucleotide or amino acid residues

use std::ffi::OsStr;
use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// Represents a single sequence with its identifier and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The sequence identifier (header without its leading marker)
    pub id: String,
    /// The sequence data (nucleotides or amino acids)
    pub data: String,
}

impl Sequence {
    /// Creates a new sequence.
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }

    /// Creates a sequence from raw residue bytes.
    ///
    /// Non UTF-8 bytes are replaced, which never happens for valid
    /// sequence alphabets.
    pub fn from_bytes(id: impl Into<String>, data: Vec<u8>) -> Self {
        let data = String::from_utf8(data)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
        Self { id: id.into(), data }
    }

    /// Returns the residues as a string slice.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Returns the residues as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets a slice of the sequence data.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = range.start.min(self.data.len());
        let end = range.end.min(self.data.len());
        &self.data[start..end]
    }
}

/// Represents an alignment of multiple sequences.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    /// All sequences in the alignment
    pub sequences: Vec<Sequence>,
    /// The expected length of all sequences (if aligned)
    alignment_length: Option<usize>,
    /// Whether all sequences have the same length
    pub is_valid_alignment: bool,
    /// Warning message if sequences have different lengths
    pub warning: Option<String>,
}

impl Alignment {
    /// Creates a new alignment from a vector of sequences.
    pub fn new(sequences: Vec<Sequence>) -> Self {
        let (is_valid, alignment_length, warning) = Self::validate_alignment(&sequences);
        Self {
            sequences,
            alignment_length,
            is_valid_alignment: is_valid,
            warning,
        }
    }

    /// Validates that all sequences have the same length.
    fn validate_alignment(sequences: &[Sequence]) -> (bool, Option<usize>, Option<String>) {
        if sequences.is_empty() {
            return (true, None, None);
        }

        let first_len = sequences[0].len();
        let all_same = sequences.iter().all(|s| s.len() == first_len);

        if all_same {
            (true, Some(first_len), None)
        } else {
            let min_len = sequences.iter().map(|s| s.len()).min().unwrap_or(0);
            let max_len = sequences.iter().map(|s| s.len()).max().unwrap_or(0);
            let warning = format!(
                "Sequences have different lengths (min: {}, max: {}). Not a valid alignment.",
                min_len, max_len
            );
            (false, Some(max_len), Some(warning))
        }
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Returns the alignment length (max sequence length).
    pub fn alignment_length(&self) -> usize {
        self.alignment_length.unwrap_or(0)
    }

    /// Gets a sequence by index.
    pub fn get(&self, index: usize) -> Option<&Sequence> {
        self.sequences.get(index)
    }

    /// Finds a sequence by identifier.
    pub fn find(&self, id: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.id == id)
    }

    /// Returns true if the alignment is empty.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Input file format of a Data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Fasta,
    Fastq,
    Csv,
}

impl DataType {
    /// Maps an extension token to a data type (case-insensitive).
    fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "fa" | "fas" | "fasta" => Some(DataType::Fasta),
            "fq" | "fastq" => Some(DataType::Fastq),
            "csv" => Some(DataType::Csv),
            _ => None,
        }
    }

    /// Infers the data type from the trailing extension of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("");
        Self::from_token(ext).ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim()).ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Fasta => write!(f, "fasta"),
            DataType::Fastq => write!(f, "fastq"),
            DataType::Csv => write!(f, "csv"),
        }
    }
}

/// Residue alphabet of a Data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeqType {
    #[default]
    Nucleotide,
    AminoAcid,
}

impl FromStr for SeqType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nucleotide" => Ok(SeqType::Nucleotide),
            "amino_acid" => Ok(SeqType::AminoAcid),
            _ => Err(Error::InvalidArgument(format!(
                "seqtype must be 'nucleotide' or 'amino_acid', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for SeqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqType::Nucleotide => write!(f, "nucleotide"),
            SeqType::AminoAcid => write!(f, "amino_acid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_creation() {
        let seq = Sequence::new("seq1", "ACGT");
        assert_eq!(seq.id, "seq1");
        assert_eq!(seq.as_str(), "ACGT");
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.slice(2..10), "GT");
    }

    #[test]
    fn test_alignment_valid() {
        let seqs = vec![
            Sequence::new("seq1", "ACGT"),
            Sequence::new("seq2", "TGCA"),
        ];
        let alignment = Alignment::new(seqs);
        assert!(alignment.is_valid_alignment);
        assert!(alignment.warning.is_none());
        assert_eq!(alignment.alignment_length(), 4);
        assert_eq!(alignment.find("seq2").unwrap().as_str(), "TGCA");
    }

    #[test]
    fn test_alignment_invalid() {
        let seqs = vec![
            Sequence::new("seq1", "ACGT"),
            Sequence::new("seq2", "TG"),
        ];
        let alignment = Alignment::new(seqs);
        assert!(!alignment.is_valid_alignment);
        assert!(alignment.warning.is_some());
        assert_eq!(alignment.alignment_length(), 4);
    }

    #[test]
    fn test_datatype_from_extension() {
        for name in ["a.fa", "a.fas", "a.fasta", "a.FASTA", "a.Fa"] {
            assert_eq!(DataType::from_path(name).unwrap(), DataType::Fasta, "{}", name);
        }
        for name in ["a.fq", "a.fastq", "a.FQ"] {
            assert_eq!(DataType::from_path(name).unwrap(), DataType::Fastq, "{}", name);
        }
        assert_eq!(DataType::from_path("dir.v2/a.CSV").unwrap(), DataType::Csv);
        assert_eq!(DataType::from_path("a.tar.fasta").unwrap(), DataType::Fasta);
    }

    #[test]
    fn test_datatype_unsupported() {
        for name in ["a.txt", "a.fna", "a.aln", "noext", "a.fasta.gz"] {
            assert!(
                matches!(DataType::from_path(name), Err(Error::UnsupportedFormat(_))),
                "{}",
                name
            );
        }
        assert!(matches!("phylip".parse::<DataType>(), Err(Error::UnsupportedFormat(_))));
        assert_eq!("FastQ".parse::<DataType>().unwrap(), DataType::Fastq);
    }

    #[test]
    fn test_seqtype_parsing() {
        assert_eq!("nucleotide".parse::<SeqType>().unwrap(), SeqType::Nucleotide);
        assert_eq!("NUCLEOTIDE".parse::<SeqType>().unwrap(), SeqType::Nucleotide);
        assert_eq!("Amino_Acid".parse::<SeqType>().unwrap(), SeqType::AminoAcid);
        for bad in ["dna", "amino acid", "aminoacid", "", "nucleotides"] {
            assert!(
                matches!(bad.parse::<SeqType>(), Err(Error::InvalidArgument(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DataType::Fastq.to_string(), "fastq");
        assert_eq!(SeqType::AminoAcid.to_string(), "amino_acid");
        assert_eq!(SeqType::default(), SeqType::Nucleotide);
    }
}
