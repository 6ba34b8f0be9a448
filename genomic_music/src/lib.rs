// Genomic Music
//
// Turns classified DNA into music. The sequence layer (`genomic_music_seq`)
// produces one row per base with its exon/intron type and amino acid; this
// crate maps those rows onto pitches and chords and assembles them into a
// multi-track 3/8 score.
//
// Architecture:
// - pitch.rs: Spelled pitches, intervals and pitch-list parsing
// - category.rs: Amino-acid side-chain categories and ranks
// - scheme.rs: The ChordScheme trait, chord identities and table plumbing
// - circle_of_fifths.rs: Triad scheme (major/minor/diminished/augmented)
// - scale_degree.rs: Jazz scheme (blues, pentatonic, mixolydian, bebop)
// - score_row.rs: The mapped row table and its CSV reader/writer
// - mapper.rs: Per-base pitch mapping plus the synthetic accompaniment track
// - score.rs: Score model and assembly from mapped rows
// - notation.rs: Note-value decomposition and barline splitting
// - musicxml.rs: MusicXML 4.0 output (primary format)
// - midi.rs: MIDI file output
// - lilypond.rs: LilyPond sheet music output (.ly files for engraving)
// - config.rs: JSON pipeline configuration
// - pipeline.rs: Stage wiring for the CLI and tests
// - error.rs: Error type for the whole pipeline
//
// Every stage is a deterministic batch transform: the same input files and
// configuration always produce the same rows and the same score.

pub mod category;
pub mod circle_of_fifths;
pub mod config;
pub mod error;
pub mod lilypond;
pub mod mapper;
pub mod midi;
pub mod musicxml;
pub mod notation;
pub mod pipeline;
pub mod pitch;
pub mod scale_degree;
pub mod scheme;
pub mod score;
pub mod score_row;

pub use error::MusicError;
