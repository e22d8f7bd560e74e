//! Basic composition statistics for a sequence pasted into a task.
//!
//! This is a small deterministic side calculation that gives every agent the
//! same numbers to reason from; it is not a bioinformatics toolkit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shortest run of residues treated as a sequence when no FASTA header is present
const MIN_BARE_SEQUENCE_LEN: usize = 8;

const NUCLEOTIDES: &str = "ACGTUN";

/// The twenty standard amino acids plus `X` for unknown
const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWYX";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Dna => write!(f, "DNA"),
            Alphabet::Rna => write!(f, "RNA"),
            Alphabet::Protein => write!(f, "protein"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStats {
    pub length: usize,
    pub alphabet: Alphabet,
    pub counts: BTreeMap<char, usize>,
    /// Fraction of G+C residues; nucleotide sequences only
    pub gc_content: Option<f64>,
}

impl SequenceStats {
    /// Extract the sequence from free text and compute its composition.
    ///
    /// With FASTA input every non-header line is used. Otherwise the longest
    /// whitespace-separated token that reads as residues is taken, provided it
    /// is at least a few residues long. Returns `None` when nothing qualifies.
    pub fn from_task_text(text: &str) -> Option<Self> {
        let residues = Self::extract_residues(text)?;
        Some(Self::compute(&residues))
    }

    fn extract_residues(text: &str) -> Option<String> {
        let has_header = text.lines().any(|l| l.trim_start().starts_with('>'));

        let residues: String = if has_header {
            text.lines()
                .map(str::trim)
                .filter(|l| !l.starts_with('>') && !l.starts_with(';'))
                .flat_map(|l| l.chars())
                .filter(|c| c.is_ascii_alphabetic() || *c == '*')
                .map(|c| c.to_ascii_uppercase())
                .collect()
        } else {
            text.split_whitespace()
                .filter(|t| t.len() >= MIN_BARE_SEQUENCE_LEN)
                .filter(|t| is_bare_residue_token(t))
                .max_by_key(|t| t.len())?
                .to_ascii_uppercase()
        };

        if residues.is_empty() {
            None
        } else {
            Some(residues)
        }
    }

    fn compute(residues: &str) -> Self {
        let mut counts = BTreeMap::new();
        for c in residues.chars() {
            *counts.entry(c).or_insert(0) += 1;
        }

        let nucleotide = residues.chars().all(|c| "ACGTUN".contains(c));
        let alphabet = if !nucleotide {
            Alphabet::Protein
        } else if counts.contains_key(&'U') && !counts.contains_key(&'T') {
            Alphabet::Rna
        } else {
            Alphabet::Dna
        };

        let length = residues.chars().count();
        let gc_content = match alphabet {
            Alphabet::Protein => None,
            _ => {
                let gc = counts.get(&'G').copied().unwrap_or(0) + counts.get(&'C').copied().unwrap_or(0);
                Some(gc as f64 / length as f64)
            }
        };

        Self {
            length,
            alphabet,
            counts,
            gc_content,
        }
    }

    /// One-paragraph summary embedded into prompts
    pub fn summary(&self) -> String {
        let counts = self
            .counts
            .iter()
            .map(|(c, n)| format!("{}={}", c, n))
            .collect::<Vec<_>>()
            .join(", ");

        match self.gc_content {
            Some(gc) => format!(
                "{} sequence, length {}, GC content {:.1}%, composition: {}",
                self.alphabet,
                self.length,
                gc * 100.0,
                counts
            ),
            None => format!(
                "{} sequence, length {}, composition: {}",
                self.alphabet, self.length, counts
            ),
        }
    }
}

/// Nucleotides are accepted in either case. Protein needs uppercase, so
/// ordinary prose words never qualify.
fn is_bare_residue_token(token: &str) -> bool {
    let nucleotide = token
        .chars()
        .all(|c| NUCLEOTIDES.contains(c.to_ascii_uppercase()));
    let protein = token.chars().all(|c| AMINO_ACIDS.contains(c));
    nucleotide || protein
}
