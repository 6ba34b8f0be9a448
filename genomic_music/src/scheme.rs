// Chord schemes: amino acid -> chord, chord x base -> pitch.
//
// A scheme is two fixed tables. The first assigns each amino acid a chord by
// zipping its category's member list against an ordered list of roots (one
// family of chords per category). The second gives, for every chord, the
// pitch that each of the bases A, T, C, G plays while that chord sounds.
//
// Both tables are arbitrary fixed assignments. They are not derived from
// music theory at runtime and must not be "corrected": a category with more
// members than roots simply leaves the excess members without a chord, and
// the occasional odd entry in a pitch row is part of the table.
//
// Chords are identified by (root, quality), not by label. Two schemes can
// print the same label (`C7` is both a blues and a mixolydian chord in the
// scale-degree scheme) without their pitch rows colliding.
//
// Implementations: `circle_of_fifths.rs` and `scale_degree.rs`. The mapper
// only sees the `ChordScheme` trait.

use crate::category::{AminoCategory, categorize};
use crate::circle_of_fifths::CircleOfFifths;
use crate::pitch::{Interval, Pitch, PitchError};
use crate::scale_degree::ScaleDegree;
use genomic_music_seq::codon::AminoAcid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order of bases in every pitch row.
const BASE_ORDER: [char; 4] = ['A', 'T', 'C', 'G'];

/// Chord families used by the two schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    BluesSeventh,
    Pentatonic,
    MixolydianDominant,
    BebopDominant,
}

impl ChordQuality {
    /// Label suffix appended to the root name.
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::BluesSeventh | ChordQuality::MixolydianDominant => "7",
            ChordQuality::Pentatonic => "pent",
            ChordQuality::BebopDominant => "9",
        }
    }

    /// Value of the `scale_type` column.
    pub fn scale_type(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
            ChordQuality::BluesSeventh => "blues",
            ChordQuality::Pentatonic => "pentatonic",
            ChordQuality::MixolydianDominant => "mixolydian",
            ChordQuality::BebopDominant => "bebop",
        }
    }

    /// Intervals stacked on the root when the full chord is voiced.
    pub fn intervals(self) -> &'static [Interval] {
        match self {
            ChordQuality::Major => &[Interval::MAJOR_THIRD, Interval::PERFECT_FIFTH],
            ChordQuality::Minor => &[Interval::MINOR_THIRD, Interval::PERFECT_FIFTH],
            ChordQuality::Diminished => &[Interval::MINOR_THIRD, Interval::DIMINISHED_FIFTH],
            ChordQuality::Augmented => &[Interval::MAJOR_THIRD, Interval::AUGMENTED_FIFTH],
            ChordQuality::BluesSeventh => &[
                Interval::MAJOR_THIRD,
                Interval::PERFECT_FIFTH,
                Interval::MINOR_SEVENTH,
            ],
            ChordQuality::Pentatonic => &[
                Interval::MAJOR_THIRD,
                Interval::PERFECT_FIFTH,
                Interval::MAJOR_NINTH,
            ],
            ChordQuality::MixolydianDominant => &[
                Interval::MAJOR_THIRD,
                Interval::MINOR_SEVENTH,
                Interval::MAJOR_NINTH,
            ],
            ChordQuality::BebopDominant => &[
                Interval::MAJOR_THIRD,
                Interval::PERFECT_FIFTH,
                Interval::MINOR_SEVENTH,
                Interval::MAJOR_NINTH,
            ],
        }
    }
}

/// A chord identity: root name (letter plus accidental, no octave) and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordId {
    pub root: &'static str,
    pub quality: ChordQuality,
}

impl ChordId {
    pub fn label(&self) -> String {
        format!("{}{}", self.root, self.quality.suffix())
    }

    /// The root as a pitch in `octave`.
    pub fn root_pitch(&self, octave: u8) -> Result<Pitch, PitchError> {
        Pitch::parse(&format!("{}{}", self.root, octave))
    }

    /// Root plus the quality's stacked intervals, all spelled from the root.
    pub fn tones(&self, octave: u8) -> Result<Vec<Pitch>, PitchError> {
        let root = self.root_pitch(octave)?;
        let mut tones = vec![root];
        for &interval in self.quality.intervals() {
            tones.push(root.transpose(interval)?);
        }
        Ok(tones)
    }
}

impl fmt::Display for ChordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.suffix())
    }
}

/// A mapping strategy from amino acids and bases to chords and pitches.
pub trait ChordScheme {
    fn name(&self) -> &'static str;

    /// Chord assigned to an amino acid, if any.
    fn chord_for(&self, aa: AminoAcid) -> Option<ChordId>;

    /// Pitch (as written in the row table) that `base` plays over `chord`.
    fn base_pitch(&self, chord: ChordId, base: char) -> Option<&'static str>;
}

/// Scheme choice in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    #[default]
    CircleOfFifths,
    ScaleDegree,
}

/// Which base-pitch table the circle-of-fifths scheme uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleVoicing {
    /// A, T, C, G play root, third, fifth and a colour tone.
    #[default]
    ChordTones,
    /// All four bases stay in one register around the root.
    Compact,
}

pub fn scheme_for(kind: SchemeKind, voicing: CircleVoicing) -> Box<dyn ChordScheme> {
    match kind {
        SchemeKind::CircleOfFifths => Box::new(CircleOfFifths::new(voicing)),
        SchemeKind::ScaleDegree => Box::new(ScaleDegree),
    }
}

// ---------------------------------------------------------------------------
// Table plumbing shared by the scheme implementations
// ---------------------------------------------------------------------------

/// One category's chord family: quality plus roots in assignment order.
pub(crate) struct ChordFamily {
    pub category: AminoCategory,
    pub quality: ChordQuality,
    pub roots: &'static [&'static str],
}

/// Base pitches for every root of one quality, bases in A T C G order.
pub(crate) struct PitchTable {
    pub quality: ChordQuality,
    pub rows: &'static [(&'static str, [&'static str; 4])],
}

/// Positional zip: the amino acid's rank in its category picks the root.
pub(crate) fn assign_chord(families: &[ChordFamily], aa: AminoAcid) -> Option<ChordId> {
    let (category, rank) = categorize(aa);
    let family = families.iter().find(|f| f.category == category)?;
    family.roots.get(rank).map(|&root| ChordId {
        root,
        quality: family.quality,
    })
}

pub(crate) fn lookup_pitch(tables: &[PitchTable], chord: ChordId, base: char) -> Option<&'static str> {
    let column = BASE_ORDER.iter().position(|&b| b == base.to_ascii_uppercase())?;
    tables
        .iter()
        .find(|t| t.quality == chord.quality)?
        .rows
        .iter()
        .find(|(root, _)| *root == chord.root)
        .map(|(_, pitches)| pitches[column])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let chord = ChordId { root: "F#", quality: ChordQuality::Diminished };
        assert_eq!(chord.label(), "F#dim");
        assert_eq!(chord.to_string(), "F#dim");
        let chord = ChordId { root: "D-", quality: ChordQuality::Major };
        assert_eq!(chord.label(), "D-");
    }

    #[test]
    fn test_triad_tones() {
        let daug = ChordId { root: "D", quality: ChordQuality::Augmented };
        let names: Vec<String> = daug.tones(3).unwrap().iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["D3", "F#3", "A#3"]);

        let bdim = ChordId { root: "B", quality: ChordQuality::Diminished };
        let names: Vec<String> = bdim.tones(3).unwrap().iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["B3", "D4", "F4"]);

        let am = ChordId { root: "A", quality: ChordQuality::Minor };
        let names: Vec<String> = am.tones(3).unwrap().iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["A3", "C4", "E4"]);
    }

    #[test]
    fn test_extended_tones() {
        let c9 = ChordId { root: "C", quality: ChordQuality::BebopDominant };
        let names: Vec<String> = c9.tones(3).unwrap().iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["C3", "E3", "G3", "B-3", "D4"]);
    }

    #[test]
    fn test_root_pitch_rejects_two_digit_octave() {
        let c = ChordId { root: "C", quality: ChordQuality::Major };
        assert!(c.root_pitch(10).is_err());
        assert_eq!(c.root_pitch(2).unwrap().to_string(), "C2");
    }

    #[test]
    fn test_scheme_for_names() {
        assert_eq!(scheme_for(SchemeKind::CircleOfFifths, CircleVoicing::default()).name(), "circle_of_fifths");
        assert_eq!(scheme_for(SchemeKind::ScaleDegree, CircleVoicing::default()).name(), "scale_degree");
    }
}
