//! Derived state for Highlighter difference plots.
//!
//! A Highlighter plot draws one row per sequence variant and marks, at
//! each alignment column, whether the variant differs from the master
//! sequence. This module builds the data behind the plot:
//! - `Compressed`: identical sequences collapsed into variants
//! - `Sample`: a random subset of variants, bounding the number of rows
//! - `DiffMatrix`: per-variant, per-column comparison with the master
//!
//! Drawing is left to the caller.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::model::Alignment;

/// A unique sequence and the identifiers carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub residues: String,
    pub ids: Vec<String>,
}

impl Variant {
    /// Number of sequences sharing this variant.
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

/// Deduplicated view of an alignment, in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct Compressed {
    variants: Vec<Variant>,
    index: HashMap<String, usize>,
}

impl Compressed {
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Looks up the variant with exactly these residues.
    pub fn get(&self, residues: &str) -> Option<&Variant> {
        self.index.get(residues).map(|&i| &self.variants[i])
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Total number of sequences across all variants.
    pub fn sequence_count(&self) -> usize {
        self.variants.iter().map(Variant::count).sum()
    }
}

/// Collapses identical residue strings (case-sensitive).
pub fn compress(alignment: &Alignment) -> Compressed {
    let mut compressed = Compressed::default();
    for seq in &alignment.sequences {
        match compressed.index.get(seq.as_str()) {
            Some(&i) => compressed.variants[i].ids.push(seq.id.clone()),
            None => {
                compressed
                    .index
                    .insert(seq.data.clone(), compressed.variants.len());
                compressed.variants.push(Variant {
                    residues: seq.data.clone(),
                    ids: vec![seq.id.clone()],
                });
            }
        }
    }
    compressed
}

/// A random subset of variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    pub variants: Vec<Variant>,
    pub seed: u64,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Draws `size` variants without replacement, keeping their relative order.
///
/// Asking for at least as many variants as exist returns all of them.
pub fn sample_variants(compressed: &Compressed, size: usize, seed: u64) -> Sample {
    let total = compressed.len();
    if size >= total {
        return Sample {
            variants: compressed.variants.clone(),
            seed,
        };
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, total, size).into_vec();
    picked.sort_unstable();

    Sample {
        variants: picked
            .into_iter()
            .map(|i| compressed.variants[i].clone())
            .collect(),
        seed,
    }
}

/// How the master sequence is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Master {
    /// The first sequence of the alignment
    #[default]
    First,
    /// The sequence with this identifier
    Id(String),
    /// Explicit residues, not necessarily present in the alignment
    Residues(String),
}

/// Comparison of one variant position against the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffCell {
    /// Same residue as the master (case-insensitive)
    Same,
    /// Different residue; holds the variant's residue
    Substitution(u8),
    /// Gap in the variant where the master has a residue
    Gap,
    /// Variant ends before this column
    Missing,
}

fn is_gap(b: u8) -> bool {
    b == b'-' || b == b'.'
}

/// One plot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub ids: Vec<String>,
    pub cells: Vec<DiffCell>,
}

impl DiffRow {
    /// Number of columns that are not `Same`.
    pub fn difference_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != DiffCell::Same).count()
    }

    /// Returns true if the row matches the master everywhere.
    pub fn is_identical(&self) -> bool {
        self.difference_count() == 0
    }
}

/// Rows = variants, columns = master positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffMatrix {
    pub rows: Vec<DiffRow>,
    pub width: usize,
}

impl DiffMatrix {
    pub fn cell(&self, row: usize, col: usize) -> Option<DiffCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col)).copied()
    }

    /// Column indices where at least one row differs from the master.
    pub fn variable_columns(&self) -> Vec<usize> {
        (0..self.width)
            .filter(|&col| {
                self.rows
                    .iter()
                    .any(|r| r.cells.get(col).is_some_and(|c| *c != DiffCell::Same))
            })
            .collect()
    }
}

/// Compares each variant with `master`, column by column.
///
/// Residues past the master's length are ignored.
pub fn diff<'a, I>(master: &str, variants: I) -> DiffMatrix
where
    I: IntoIterator<Item = &'a Variant>,
{
    let master = master.as_bytes();
    let rows = variants
        .into_iter()
        .map(|variant| {
            let residues = variant.residues.as_bytes();
            let cells = master
                .iter()
                .enumerate()
                .map(|(col, &m)| match residues.get(col) {
                    None => DiffCell::Missing,
                    Some(&r) if r.eq_ignore_ascii_case(&m) => DiffCell::Same,
                    Some(&r) if is_gap(r) && is_gap(m) => DiffCell::Same,
                    Some(&r) if is_gap(r) && !is_gap(m) => DiffCell::Gap,
                    Some(&r) => DiffCell::Substitution(r),
                })
                .collect();
            DiffRow {
                ids: variant.ids.clone(),
                cells,
            }
        })
        .collect();

    DiffMatrix {
        rows,
        width: master.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sequence;

    fn alignment() -> Alignment {
        Alignment::new(vec![
            Sequence::new("a", "ACGT"),
            Sequence::new("b", "ACGA"),
            Sequence::new("c", "ACGT"),
            Sequence::new("d", "AC-T"),
            Sequence::new("e", "ACGA"),
        ])
    }

    fn variant(residues: &str, id: &str) -> Variant {
        Variant {
            residues: residues.to_string(),
            ids: vec![id.to_string()],
        }
    }

    #[test]
    fn test_compress_counts_and_order() {
        let compressed = compress(&alignment());

        assert_eq!(compressed.len(), 3);
        assert_eq!(compressed.sequence_count(), 5);
        assert_eq!(compressed.variants()[0].residues, "ACGT");
        assert_eq!(compressed.variants()[0].ids, vec!["a", "c"]);
        assert_eq!(compressed.variants()[1].residues, "ACGA");
        assert_eq!(compressed.get("ACGA").unwrap().count(), 2);
        assert_eq!(compressed.get("AC-T").unwrap().ids, vec!["d"]);
        assert!(compressed.get("TTTT").is_none());
    }

    #[test]
    fn test_compress_is_case_sensitive() {
        let alignment = Alignment::new(vec![
            Sequence::new("a", "acgt"),
            Sequence::new("b", "ACGT"),
        ]);
        assert_eq!(compress(&alignment).len(), 2);
    }

    #[test]
    fn test_sample_bounds() {
        let compressed = compress(&alignment());

        let all = sample_variants(&compressed, 10, 1);
        assert_eq!(all.len(), 3);
        assert_eq!(all.variants, compressed.variants());

        let two = sample_variants(&compressed, 2, 1);
        assert_eq!(two.len(), 2);
        for v in &two.variants {
            assert!(compressed.get(&v.residues).is_some());
        }
        assert_ne!(two.variants[0], two.variants[1]);

        assert!(sample_variants(&compressed, 0, 1).is_empty());
    }

    #[test]
    fn test_sample_deterministic_with_seed() {
        let seqs = (0..50)
            .map(|i| Sequence::new(format!("s{}", i), format!("ACGT{:03}", i)))
            .collect();
        let compressed = compress(&Alignment::new(seqs));

        let first = sample_variants(&compressed, 10, 42);
        let second = sample_variants(&compressed, 10, 42);
        assert_eq!(first, second);

        // Relative order of the compressed variants is kept
        let positions: Vec<usize> = first
            .variants
            .iter()
            .map(|v| compressed.variants().iter().position(|c| c == v).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_diff_cells() {
        let compressed = compress(&alignment());
        let matrix = diff("ACGT", compressed.variants());

        assert_eq!(matrix.width, 4);
        assert_eq!(matrix.rows.len(), 3);
        assert!(matrix.rows[0].is_identical());
        assert_eq!(matrix.cell(1, 3), Some(DiffCell::Substitution(b'A')));
        assert_eq!(matrix.cell(2, 2), Some(DiffCell::Gap));
        assert_eq!(matrix.rows[2].difference_count(), 1);
        assert_eq!(matrix.variable_columns(), vec![2, 3]);
    }

    #[test]
    fn test_diff_case_insensitive_and_short_rows() {
        let variants = [
            variant("acgt", "x"),
            variant("AC", "y"),
            variant("A-GTTT", "z"),
        ];
        let matrix = diff("AC-T", &variants);

        assert!(matrix.rows[0].cells[..2].iter().all(|c| *c == DiffCell::Same));
        assert_eq!(matrix.cell(0, 2), Some(DiffCell::Substitution(b'g')));
        assert_eq!(matrix.cell(1, 2), Some(DiffCell::Missing));
        assert_eq!(matrix.cell(1, 3), Some(DiffCell::Missing));
        // A gap facing a master gap is a match, a gap facing a residue is not
        assert_eq!(matrix.cell(2, 1), Some(DiffCell::Gap));
        assert_eq!(matrix.rows[2].cells.len(), 4);
        assert_eq!(matrix.cell(2, 2), Some(DiffCell::Substitution(b'G')));
    }

    #[test]
    fn test_gap_symbols_are_equivalent() {
        let variants = [variant("A.G-", "x"), variant("A-.T", "y")];
        let matrix = diff("A-G.", &variants);

        assert!(matrix.rows[0].is_identical());
        assert_eq!(matrix.cell(1, 1), Some(DiffCell::Same));
        assert_eq!(matrix.cell(1, 2), Some(DiffCell::Gap));
        assert_eq!(matrix.cell(1, 3), Some(DiffCell::Substitution(b'T')));
    }
}
