// Error type for the music layer.
//
// Wraps the sequence layer's errors so a whole pipeline run has one error
// type. Row-level problems (unparseable pitches, unvoiceable roots) never
// reach here; the mapper and assembler log and skip them.

use genomic_music_seq::SeqError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MusicError {
    #[error(transparent)]
    Seq(#[from] SeqError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The interval policy was selected but no coordinate table was given.
    #[error("the interval policy needs a coordinate table")]
    MissingCoordinates,
}
