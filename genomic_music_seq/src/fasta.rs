// FASTA loading.
//
// Records are delimited by `>` header lines. Body lines are trimmed and
// concatenated, then uppercased. Header text is discarded: sequences are
// identified only by their position in the file, which becomes the
// `Sequence{n}` label used as the track name all the way to the score.
//
// A header with no body produces no sequence, so labels are numbered over
// the non-empty records only.

use crate::error::SeqError;
use std::path::Path;

/// Header-line marker.
const RECORD_MARKER: char = '>';

/// One loaded nucleotide sequence. Immutable after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// Track label, `Sequence1` for the first non-empty record.
    pub label: String,
    /// Uppercased bases, possibly containing `-` alignment gaps.
    pub bases: String,
}

impl Sequence {
    pub fn new(index: usize, bases: String) -> Self {
        Sequence {
            label: format!("Sequence{}", index + 1),
            bases,
        }
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Parse FASTA text into labelled sequences, preserving record order.
pub fn parse_fasta(text: &str) -> Vec<Sequence> {
    let mut bodies: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.starts_with(RECORD_MARKER) {
            if !current.is_empty() {
                bodies.push(std::mem::take(&mut current));
            }
        } else {
            current.push_str(line.trim());
        }
    }
    if !current.is_empty() {
        bodies.push(current);
    }

    bodies
        .into_iter()
        .enumerate()
        .map(|(i, body)| Sequence::new(i, body.to_ascii_uppercase()))
        .collect()
}

/// Read and parse a FASTA file.
pub fn load_fasta(path: &Path) -> Result<Vec<Sequence>, SeqError> {
    let text = std::fs::read_to_string(path)?;
    let sequences = parse_fasta(&text);
    log::info!("Loaded {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Select the reference sequence at `index` (0-based). Missing records are a
/// structural failure rather than a silent fallback to another sequence.
pub fn reference(sequences: &[Sequence], index: usize) -> Result<&Sequence, SeqError> {
    sequences.get(index).ok_or(SeqError::TooFewSequences {
        needed: index + 1,
        found: sequences.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_lines_are_concatenated() {
        let seqs = parse_fasta(">one\nATG\nAAA\n>two\nccc\n");
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].bases, "ATGAAA");
        assert_eq!(seqs[0].label, "Sequence1");
        assert_eq!(seqs[1].bases, "CCC");
        assert_eq!(seqs[1].label, "Sequence2");
    }

    #[test]
    fn test_trailing_record_without_marker_is_flushed() {
        let seqs = parse_fasta(">a\nAT\n>b\nGG");
        assert_eq!(seqs.last().map(|s| s.bases.as_str()), Some("GG"));
    }

    #[test]
    fn test_empty_record_yields_no_entry() {
        let seqs = parse_fasta(">empty\n>full\nACGT\n");
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].label, "Sequence1");
        assert_eq!(seqs[0].bases, "ACGT");
    }

    #[test]
    fn test_whitespace_and_gaps_preserved_correctly() {
        let seqs = parse_fasta(">x\n  at-g  \r\n");
        assert_eq!(seqs[0].bases, "AT-G");
    }

    #[test]
    fn test_reference_requires_enough_records() {
        let seqs = parse_fasta(">only\nACGT\n");
        match reference(&seqs, 1) {
            Err(SeqError::TooFewSequences { needed, found }) => {
                assert_eq!(needed, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected TooFewSequences, got {other:?}"),
        }
        assert_eq!(reference(&seqs, 0).map(|s| s.len()).ok(), Some(4));
    }
}
