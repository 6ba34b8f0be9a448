// Score model and assembly.
//
// A score is an ordered list of tracks, one per row label in first-seen
// order, each a flat sequence of events (rest, note or chord) measured in
// eighth notes. The meter is fixed at 3/8, so one bar holds exactly one
// codon's worth of per-base notes.
//
// Assembly never fails on row content. An empty or unparseable `pitch`
// becomes a rest (with a warning for the unparseable case), and a duration
// that is not a positive whole number of eighths falls back to the default
// for the row's kind.
//
// The writers (`musicxml.rs`, `midi.rs`, `lilypond.rs`) only read this model.

use crate::pitch::{Pitch, parse_pitch_list};
use crate::score_row::ScoreRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Beats per bar and beat unit.
pub const TIME_SIGNATURE: (u8, u8) = (3, 8);

/// Bar length in eighth notes.
pub const BAR_EIGHTHS: usize = 3;

/// Default length of a per-base event, in eighths.
pub const BASE_EIGHTHS: usize = 1;

/// Default length of a synthetic (one-per-codon) event, in eighths.
pub const CODON_EIGHTHS: usize = 3;

/// Rounding slack when converting fractional durations to eighths.
const DURATION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub title: String,
    pub tempo_bpm: u16,
    /// General MIDI program (0-based) for labels without an entry in `programs`.
    pub default_program: u8,
    pub programs: BTreeMap<String, u8>,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        ScoreConfig {
            title: "Genomic Music".to_string(),
            tempo_bpm: 72,
            default_program: 0,
            programs: BTreeMap::new(),
        }
    }
}

impl ScoreConfig {
    pub fn program_for(&self, label: &str) -> u8 {
        self.programs.get(label).copied().unwrap_or(self.default_program)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Rest,
    Note(Pitch),
    Chord(Vec<Pitch>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Length in eighth notes, always at least one.
    pub duration: usize,
    pub accent: bool,
}

impl Event {
    /// Sounding pitches, lowest-index first; empty for a rest.
    pub fn pitches(&self) -> &[Pitch] {
        match &self.kind {
            EventKind::Rest => &[],
            EventKind::Note(p) => std::slice::from_ref(p),
            EventKind::Chord(ps) => ps.as_slice(),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.kind, EventKind::Rest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clef {
    Treble,
    Bass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub label: String,
    pub program: u8,
    pub events: Vec<Event>,
}

impl Track {
    pub fn total_eighths(&self) -> usize {
        self.events.iter().map(|e| e.duration).sum()
    }

    /// Bass clef when the track's average pitch sits below middle C.
    pub fn clef(&self) -> Clef {
        let keys: Vec<i32> = self
            .events
            .iter()
            .flat_map(|e| e.pitches())
            .map(Pitch::midi_number)
            .collect();
        if keys.is_empty() {
            return Clef::Treble;
        }
        let mean = keys.iter().sum::<i32>() as f64 / keys.len() as f64;
        if mean < 60.0 { Clef::Bass } else { Clef::Treble }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub title: String,
    pub tempo_bpm: u16,
    pub tracks: Vec<Track>,
}

/// Build the score. `synthetic_label` marks the one-per-codon track, whose
/// events default to a dotted quarter instead of an eighth.
pub fn assemble(rows: &[ScoreRow], config: &ScoreConfig, synthetic_label: &str) -> Score {
    let mut tracks: Vec<Track> = Vec::new();
    for row in rows {
        let index = match tracks.iter().position(|t| t.label == row.header) {
            Some(i) => i,
            None => {
                tracks.push(Track {
                    label: row.header.clone(),
                    program: config.program_for(&row.header),
                    events: Vec::new(),
                });
                tracks.len() - 1
            }
        };
        let default_eighths = if row.header == synthetic_label {
            CODON_EIGHTHS
        } else {
            BASE_EIGHTHS
        };
        tracks[index].events.push(event_for(row, default_eighths));
    }

    for track in &tracks {
        let notes = track.events.iter().filter(|e| !e.is_rest()).count();
        log::info!(
            "Track {}: {} events ({} sounding), {} eighths, program {}",
            track.label,
            track.events.len(),
            notes,
            track.total_eighths(),
            track.program
        );
    }

    Score {
        title: config.title.clone(),
        tempo_bpm: config.tempo_bpm,
        tracks,
    }
}

fn event_for(row: &ScoreRow, default_eighths: usize) -> Event {
    let kind = match parse_pitch_list(&row.pitch) {
        Ok(pitches) => match pitches.len() {
            0 => EventKind::Rest,
            1 => EventKind::Note(pitches[0]),
            _ => EventKind::Chord(pitches),
        },
        Err(e) => {
            log::warn!(
                "{} {}: unparseable pitch {:?} ({}), using a rest",
                row.header,
                row.position,
                row.pitch,
                e
            );
            EventKind::Rest
        }
    };
    let duration = row
        .duration
        .and_then(duration_in_eighths)
        .unwrap_or_else(|| {
            if row.duration.is_some() {
                log::warn!(
                    "{} {}: duration {:?} is not a whole number of eighths",
                    row.header,
                    row.position,
                    row.duration
                );
            }
            default_eighths
        });
    Event {
        kind,
        duration,
        accent: row.accent,
    }
}

/// A whole-note fraction as a positive number of eighths, if it is one.
pub fn duration_in_eighths(fraction: f64) -> Option<usize> {
    let eighths = fraction * 8.0;
    let rounded = eighths.round();
    if rounded >= 1.0 && (eighths - rounded).abs() < DURATION_EPSILON {
        Some(rounded as usize)
    } else {
        None
    }
}
