// Error type for the sequence layer.
//
// Only structural problems surface here. Malformed coordinate fields and
// unknown codons are not errors: the annotator logs and skips them, and the
// codon table resolves misses to `None`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeqError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row table lacks a column every row needs.
    #[error("row table has no {0:?} column")]
    MissingColumn(String),

    /// The run needs a record (usually the reference) that the FASTA input
    /// does not have.
    #[error("expected at least {needed} sequences, found {found}")]
    TooFewSequences { needed: usize, found: usize },

    /// The interval policy needs an offset, but no coordinate row produced one.
    #[error("coordinate table did not provide a start offset")]
    MissingOffset,

    /// A sequence extends past the end of the reference used for
    /// gap-based classification.
    #[error("{label} is {len} bases long but the reference has only {reference_len}")]
    ReferenceTooShort {
        label: String,
        len: usize,
        reference_len: usize,
    },
}
