// Exon/intron classification and row emission.
//
// Each sequence is walked in windows of three bases. Two policies decide
// whether a position is coding; exactly one is used per run:
//
// - Interval: the window's genomic position is `offset + window_start`; it
//   is exonic iff some annotated CDS region contains it. The amino acid of an
//   exonic window is copied onto all three of its bases.
// - Reference-gap: base `j` is exonic iff the designated reference sequence
//   (an alignment with `-` marking intronic columns) has a base at `j`.
//   Positions are reported 1-based.
//
// A trailing window shorter than three bases keeps its raw bases with no
// amino acid. Under the interval policy each of those bases is classified at
// its own position.
//
// Every row gets the base duration (an eighth note) and, optionally, an
// accent on the first base of each codon window, so that codon boundaries
// are audible downstream.
//
// See also: `annotation.rs` for where regions come from, `row.rs` for the
// output table, and `genomic_music::mapper` for the consumer.

use crate::annotation::AnnotationSet;
use crate::codon::{AminoAcid, CODON_LEN, translate, translate_sequence};
use crate::error::SeqError;
use crate::fasta::Sequence;
use crate::row::{BASE_DURATION, PositionType, Row};
use serde::{Deserialize, Serialize};

/// Gap character in aligned sequences.
pub const GAP: u8 = b'-';

/// Which classification policy a run uses (the configuration-level choice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Interval,
    ReferenceGap,
}

/// A policy together with the data it needs.
#[derive(Debug, Clone, Copy)]
pub enum ClassificationPolicy<'a> {
    Interval(&'a AnnotationSet),
    ReferenceGap(&'a Sequence),
}

/// Classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub policy: PolicyKind,
    /// 0-based index of the reference record for the reference-gap policy.
    pub reference_index: usize,
    /// Mark the first base of every codon window with an accent.
    pub accent_codon_starts: bool,
    /// Duration written on every row, as a fraction of a whole note.
    pub base_duration: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            policy: PolicyKind::Interval,
            reference_index: 1,
            accent_codon_starts: true,
            base_duration: BASE_DURATION,
        }
    }
}

/// Classify every sequence, concatenating their rows in sequence order.
pub fn classify_all(
    sequences: &[Sequence],
    policy: ClassificationPolicy<'_>,
    config: &ClassifierConfig,
) -> Result<Vec<Row>, SeqError> {
    let mut rows = Vec::new();
    for seq in sequences {
        rows.extend(classify_sequence(seq, policy, config)?);
    }
    log::info!("Classified {} sequences into {} rows", sequences.len(), rows.len());
    Ok(rows)
}

/// Classify one sequence under the given policy.
pub fn classify_sequence(
    seq: &Sequence,
    policy: ClassificationPolicy<'_>,
    config: &ClassifierConfig,
) -> Result<Vec<Row>, SeqError> {
    match policy {
        ClassificationPolicy::Interval(annotations) => classify_by_interval(seq, annotations, config),
        ClassificationPolicy::ReferenceGap(reference) => {
            classify_by_reference_gap(seq, reference, config)
        }
    }
}

fn classify_by_interval(
    seq: &Sequence,
    annotations: &AnnotationSet,
    config: &ClassifierConfig,
) -> Result<Vec<Row>, SeqError> {
    let offset = annotations.require_offset()?;
    let mut rows = Vec::with_capacity(seq.len());

    for (w, window) in seq.bases.as_bytes().chunks(CODON_LEN).enumerate() {
        let start = offset + (w * CODON_LEN) as i64;

        if window.len() == CODON_LEN {
            let position_type = type_for(annotations.contains(start));
            let amino_acid = if position_type.is_exon() {
                std::str::from_utf8(window).ok().and_then(translate)
            } else {
                None
            };
            for (k, &base) in window.iter().enumerate() {
                rows.push(make_row(seq, start + k as i64, base, position_type, amino_acid, k, config));
            }
        } else {
            for (k, &base) in window.iter().enumerate() {
                let position = start + k as i64;
                let position_type = type_for(annotations.contains(position));
                rows.push(make_row(seq, position, base, position_type, None, k, config));
            }
        }
    }
    Ok(rows)
}

fn classify_by_reference_gap(
    seq: &Sequence,
    reference: &Sequence,
    config: &ClassifierConfig,
) -> Result<Vec<Row>, SeqError> {
    if seq.len() > reference.len() {
        return Err(SeqError::ReferenceTooShort {
            label: seq.label.clone(),
            len: seq.len(),
            reference_len: reference.len(),
        });
    }

    let reference = reference.bases.as_bytes();
    let amino_acids = translate_sequence(&seq.bases);
    let mut rows = Vec::with_capacity(seq.len());

    for (j, &base) in seq.bases.as_bytes().iter().enumerate() {
        let position_type = type_for(reference[j] != GAP);
        let amino_acid = if position_type.is_exon() {
            amino_acids.get(j / CODON_LEN).copied().flatten()
        } else {
            None
        };
        rows.push(make_row(
            seq,
            j as i64 + 1,
            base,
            position_type,
            amino_acid,
            j % CODON_LEN,
            config,
        ));
    }
    Ok(rows)
}

fn type_for(exon: bool) -> PositionType {
    if exon { PositionType::Exon } else { PositionType::Intron }
}

fn make_row(
    seq: &Sequence,
    position: i64,
    base: u8,
    position_type: PositionType,
    amino_acid: Option<AminoAcid>,
    offset_in_codon: usize,
    config: &ClassifierConfig,
) -> Row {
    Row {
        header: seq.label.clone(),
        position,
        base: base as char,
        position_type,
        amino_acid,
        duration: Some(config.base_duration),
        accent: config.accent_codon_starts && offset_in_codon == 0,
    }
}
