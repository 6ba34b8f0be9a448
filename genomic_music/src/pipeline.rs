// Stage wiring shared by the CLI and the integration tests.
//
// Each stage reads its input from a path or from the previous stage's rows,
// so a run can stop after any stage and resume later from the CSV it wrote.
// `run` chains all of them in memory and writes the intermediate tables only
// when asked to.

use crate::config::PipelineConfig;
use crate::error::MusicError;
use crate::lilypond::write_lilypond;
use crate::mapper::map_rows;
use crate::midi::write_midi;
use crate::musicxml::write_musicxml;
use crate::score::{Score, assemble};
use crate::score_row::{ScoreRow, save_score_rows};
use genomic_music_seq::annotation::{AnnotationSet, load_annotations};
use genomic_music_seq::classify::{ClassificationPolicy, ClassifierConfig, PolicyKind, classify_all};
use genomic_music_seq::fasta::{Sequence, load_fasta, reference};
use genomic_music_seq::row::{Row, save_rows};
use std::path::{Path, PathBuf};

/// Score files to write; any subset may be requested.
#[derive(Debug, Clone, Default)]
pub struct ScoreOutputs {
    pub musicxml: Option<PathBuf>,
    pub midi: Option<PathBuf>,
    pub lilypond: Option<PathBuf>,
}

/// Classify already-loaded sequences under the configured policy.
pub fn classify_sequences(
    sequences: &[Sequence],
    annotations: Option<&AnnotationSet>,
    config: &ClassifierConfig,
) -> Result<Vec<Row>, MusicError> {
    let rows = match config.policy {
        PolicyKind::Interval => {
            let annotations = annotations.ok_or(MusicError::MissingCoordinates)?;
            classify_all(sequences, ClassificationPolicy::Interval(annotations), config)?
        }
        PolicyKind::ReferenceGap => {
            let reference = reference(sequences, config.reference_index)?;
            log::info!("Reference for gap classification: {}", reference.label);
            classify_all(sequences, ClassificationPolicy::ReferenceGap(reference), config)?
        }
    };
    Ok(rows)
}

/// Load the FASTA file (and the coordinate table when the policy needs it)
/// and classify every sequence.
pub fn classify_files(
    fasta: &Path,
    coordinates: Option<&Path>,
    config: &ClassifierConfig,
) -> Result<Vec<Row>, MusicError> {
    let sequences = load_fasta(fasta)?;
    let annotations = match (config.policy, coordinates) {
        (PolicyKind::Interval, Some(path)) => Some(load_annotations(path)?),
        _ => None,
    };
    classify_sequences(&sequences, annotations.as_ref(), config)
}

pub fn build_score(rows: &[ScoreRow], config: &PipelineConfig) -> Score {
    assemble(rows, &config.score, &config.mapper.synthetic_label)
}

pub fn write_outputs(score: &Score, outputs: &ScoreOutputs) -> Result<(), MusicError> {
    if let Some(path) = &outputs.musicxml {
        write_musicxml(score, path)?;
    }
    if let Some(path) = &outputs.midi {
        write_midi(score, path)?;
    }
    if let Some(path) = &outputs.lilypond {
        write_lilypond(score, path)?;
    }
    Ok(())
}

/// Intermediate tables `run` should keep on disk.
#[derive(Debug, Clone, Default)]
pub struct RunTables {
    pub classified: Option<PathBuf>,
    pub mapped: Option<PathBuf>,
}

/// All stages in one pass.
pub fn run(
    fasta: &Path,
    coordinates: Option<&Path>,
    config: &PipelineConfig,
    tables: &RunTables,
    outputs: &ScoreOutputs,
) -> Result<Score, MusicError> {
    let rows = classify_files(fasta, coordinates, &config.classifier)?;
    if let Some(path) = &tables.classified {
        save_rows(path, &rows)?;
    }
    let mapped = map_rows(&rows, &config.mapper);
    if let Some(path) = &tables.mapped {
        save_score_rows(path, &mapped)?;
    }
    let score = build_score(&mapped, config);
    write_outputs(&score, outputs)?;
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genomic_music_seq::SeqError;
    use genomic_music_seq::fasta::parse_fasta;

    #[test]
    fn test_interval_policy_needs_coordinates() {
        let seqs = parse_fasta(">a\nATG\n");
        let err = classify_sequences(&seqs, None, &ClassifierConfig::default()).unwrap_err();
        assert!(matches!(err, MusicError::MissingCoordinates));
    }

    #[test]
    fn test_reference_gap_needs_reference_record() {
        let seqs = parse_fasta(">only\nATG\n");
        let config = ClassifierConfig {
            policy: PolicyKind::ReferenceGap,
            ..Default::default()
        };
        let err = classify_sequences(&seqs, None, &config).unwrap_err();
        assert!(matches!(
            err,
            MusicError::Seq(SeqError::TooFewSequences { needed: 2, found: 1 })
        ));
    }

    #[test]
    fn test_second_record_is_the_default_reference() {
        let seqs = parse_fasta(">a\nATGC\n>ref\nAT-G\n");
        let config = ClassifierConfig {
            policy: PolicyKind::ReferenceGap,
            ..Default::default()
        };
        let rows = classify_sequences(&seqs, None, &config).unwrap();
        let types: Vec<&str> = rows[..4].iter().map(|r| r.position_type.as_str()).collect();
        assert_eq!(types, vec!["exon", "exon", "intron", "exon"]);
    }
}
