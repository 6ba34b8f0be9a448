// Genomic Music sequence layer.
//
// Everything that happens before any music theory is involved: reading
// sequences, reading coding-region coordinates, translating codons and
// deciding for every base whether it sits in an exon or an intron. The
// output is a flat table of rows (one per base) that the `genomic_music`
// crate turns into pitches, chords and finally a score.
//
// Architecture:
// - fasta.rs: Multi-record FASTA parsing into labelled, uppercased sequences
// - annotation.rs: Tab-separated CDS coordinate table -> regions + offset
// - codon.rs: Amino-acid enum and the standard codon table
// - classify.rs: Interval and reference-gap exon/intron policies, row emission
// - row.rs: The intermediate row table and its CSV reader/writer
// - error.rs: Error type shared by the modules above
//
// Nothing here keeps state between calls; every function is a pure batch
// transform over its input.

pub mod annotation;
pub mod classify;
pub mod codon;
pub mod error;
pub mod fasta;
pub mod row;

pub use error::SeqError;
