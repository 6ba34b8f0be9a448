// Pitch/chord mapper.
//
// Turns classifier rows into score rows. For every base:
//
// - exon with an amino acid: the scheme assigns a chord, and the base picks
//   its pitch from that chord's row (A, T, C, G columns);
// - intron: either the flat intron table (A4, E4, C4, G4) or silence,
//   depending on `IntronVoicing`;
// - anything unresolved (stop codon, gap, unknown base): empty pitch.
//
// On top of the per-base rows, a synthetic accompaniment track is derived
// from one source track, one row per codon window. An exonic window with a
// chord plays its root an octave below the melody (`RootNote`) or the whole
// chord (`FullChord`); every other window is a rest of the same length.
//
// Input rows that already carry the synthetic label are discarded before
// mapping, so running the mapper on its own output reproduces that output.
//
// See also: `scheme.rs` for the chord tables, `score.rs` for how the
// mapped rows become events.

use crate::pitch::{Pitch, PitchError, format_pitch_list};
use crate::scheme::{ChordId, ChordScheme, CircleVoicing, SchemeKind, scheme_for};
use crate::score_row::ScoreRow;
use genomic_music_seq::codon::CODON_LEN;
use genomic_music_seq::row::{BASE_DURATION, Row};
use serde::{Deserialize, Serialize};

/// Flat intron pitches, one octave, by base.
const INTRON_PITCHES: [(char, &str); 4] = [('A', "A4"), ('T', "E4"), ('C', "C4"), ('G', "G4")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntronVoicing {
    /// Intronic bases play the flat intron table.
    #[default]
    Flat,
    /// Intronic bases are rests.
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticMode {
    /// The chord root alone.
    #[default]
    RootNote,
    /// Root plus the chord's stacked intervals, as one simultaneous chord.
    FullChord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub scheme: SchemeKind,
    /// Base-pitch table for the circle-of-fifths scheme.
    pub voicing: CircleVoicing,
    pub intron_voicing: IntronVoicing,
    /// Label of the derived accompaniment track.
    pub synthetic_label: String,
    /// Track the accompaniment is derived from.
    pub synthetic_source: String,
    pub synthetic_mode: SyntheticMode,
    /// Octave of the accompaniment root (one below the melody register).
    pub synthetic_octave: u8,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            scheme: SchemeKind::CircleOfFifths,
            voicing: CircleVoicing::ChordTones,
            intron_voicing: IntronVoicing::Flat,
            synthetic_label: "SequenceX".to_string(),
            synthetic_source: "Sequence1".to_string(),
            synthetic_mode: SyntheticMode::RootNote,
            synthetic_octave: 3,
        }
    }
}

pub fn intron_pitch(base: char) -> Option<&'static str> {
    let base = base.to_ascii_uppercase();
    INTRON_PITCHES.iter().find(|(b, _)| *b == base).map(|(_, p)| *p)
}

/// Map every row and append the synthetic track.
pub fn map_rows(rows: &[Row], config: &MapperConfig) -> Vec<ScoreRow> {
    let scheme = scheme_for(config.scheme, config.voicing);
    let source: Vec<&Row> = rows
        .iter()
        .filter(|r| r.header != config.synthetic_label)
        .collect();
    if source.len() < rows.len() {
        log::info!(
            "Dropped {} existing {} rows before remapping",
            rows.len() - source.len(),
            config.synthetic_label
        );
    }

    let mut mapped: Vec<ScoreRow> = source
        .iter()
        .map(|row| map_row(row, scheme.as_ref(), config))
        .collect();
    let synthetic = synthetic_rows(&source, scheme.as_ref(), config);
    log::info!(
        "Mapped {} rows with the {} scheme, derived {} {} rows from {}",
        mapped.len(),
        scheme.name(),
        synthetic.len(),
        config.synthetic_label,
        config.synthetic_source
    );
    mapped.extend(synthetic);
    mapped
}

/// Pitch and chord for a single base.
pub fn map_row(row: &Row, scheme: &dyn ChordScheme, config: &MapperConfig) -> ScoreRow {
    let chord = row.amino_acid.and_then(|aa| scheme.chord_for(aa));
    let pitch = if row.position_type.is_exon() {
        chord.and_then(|c| scheme.base_pitch(c, row.base))
    } else {
        match config.intron_voicing {
            IntronVoicing::Flat => intron_pitch(row.base),
            IntronVoicing::Silent => None,
        }
    };
    log::debug!("{} {} {}: chord {:?} pitch {:?}", row.header, row.position, row.base, chord, pitch);

    let mut out = ScoreRow::from_row(row);
    out.pitch = pitch.unwrap_or_default().to_string();
    set_chord_columns(&mut out, chord);
    out
}

fn set_chord_columns(row: &mut ScoreRow, chord: Option<ChordId>) {
    if let Some(chord) = chord {
        row.amino_acid_chord = chord.label();
        row.scale_type = chord.quality.scale_type().to_string();
    }
}

/// One accompaniment row per codon window of the source track. Windows
/// whose root cannot be voiced are logged and skipped.
fn synthetic_rows(source: &[&Row], scheme: &dyn ChordScheme, config: &MapperConfig) -> Vec<ScoreRow> {
    let track: Vec<&Row> = source
        .iter()
        .copied()
        .filter(|r| r.header == config.synthetic_source)
        .collect();
    if track.is_empty() {
        log::warn!(
            "No rows for {}; {} will be empty",
            config.synthetic_source,
            config.synthetic_label
        );
        return Vec::new();
    }

    let mut out = Vec::with_capacity(track.len() / CODON_LEN + 1);
    for window in track.chunks(CODON_LEN) {
        let first = window[0];
        match synthetic_row(first, window.len(), scheme, config) {
            Ok(row) => out.push(row),
            Err(e) => log::warn!(
                "Skipping {} row at {} {}: {}",
                config.synthetic_label, first.header, first.position, e
            ),
        }
    }
    out
}

fn synthetic_row(
    first: &Row,
    window_len: usize,
    scheme: &dyn ChordScheme,
    config: &MapperConfig,
) -> Result<ScoreRow, PitchError> {
    let chord = if first.position_type.is_exon() {
        first.amino_acid.and_then(|aa| scheme.chord_for(aa))
    } else {
        None
    };
    let pitches: Vec<Pitch> = match (chord, config.synthetic_mode) {
        (None, _) => Vec::new(),
        (Some(c), SyntheticMode::RootNote) => vec![c.root_pitch(config.synthetic_octave)?],
        (Some(c), SyntheticMode::FullChord) => c.tones(config.synthetic_octave)?,
    };

    let mut row = ScoreRow::from_row(first);
    row.header = config.synthetic_label.clone();
    row.duration = Some(first.duration.unwrap_or(BASE_DURATION) * window_len as f64);
    row.pitch = format_pitch_list(&pitches);
    set_chord_columns(&mut row, chord);
    Ok(row)
}
