// Scale-degree chord scheme.
//
// The jazz-flavoured alternative to the circle of fifths. Each category maps
// to a scale colour rather than a triad quality:
//
// - non-polar -> blues dominant sevenths (A root, T third, C fifth, G flat 7th)
// - polar     -> major pentatonic tones (A root, T 2nd, C 3rd, G 5th)
// - basic     -> mixolydian dominants voiced an octave lower
// - acidic    -> bebop ninths (A root, T third, C flat 7th, G 9th)
//
// The blues and mixolydian families share the `7` label (`C7`, `G7`, `F7`
// appear in both). Their pitch rows differ and are looked up by quality, so
// neither overrides the other.

use crate::category::AminoCategory;
use crate::scheme::{
    ChordFamily, ChordId, ChordQuality, ChordScheme, PitchTable, assign_chord, lookup_pitch,
};
use genomic_music_seq::codon::AminoAcid;

static FAMILIES: [ChordFamily; 4] = [
    ChordFamily {
        category: AminoCategory::NonPolar,
        quality: ChordQuality::BluesSeventh,
        roots: &["C", "F", "G", "D", "A", "E", "B-", "E-", "B"],
    },
    ChordFamily {
        category: AminoCategory::Polar,
        quality: ChordQuality::Pentatonic,
        roots: &["C", "G", "D", "A", "E", "F"],
    },
    ChordFamily {
        category: AminoCategory::Basic,
        quality: ChordQuality::MixolydianDominant,
        roots: &["G", "C", "F"],
    },
    ChordFamily {
        category: AminoCategory::Acidic,
        quality: ChordQuality::BebopDominant,
        roots: &["C", "F"],
    },
];

static TABLES: [PitchTable; 4] = [
    PitchTable {
        quality: ChordQuality::BluesSeventh,
        rows: &[
            ("C", ["C4", "E4", "G4", "B-4"]),
            ("F", ["F4", "A4", "C5", "E-5"]),
            ("G", ["G4", "B4", "D5", "F5"]),
            ("D", ["D4", "F#4", "A4", "C5"]),
            ("A", ["A4", "C#5", "E5", "G5"]),
            ("E", ["E4", "G#4", "B4", "D5"]),
            ("B-", ["B-4", "D5", "F5", "A-5"]),
            ("E-", ["E-4", "G4", "B-4", "D-5"]),
            ("B", ["B4", "D#5", "F#5", "A5"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::Pentatonic,
        rows: &[
            ("C", ["C4", "D4", "E4", "G4"]),
            ("G", ["G4", "A4", "B4", "D5"]),
            ("D", ["D4", "E4", "F#4", "A4"]),
            ("A", ["A4", "B4", "C#5", "E5"]),
            ("E", ["E4", "F#4", "G#4", "B4"]),
            ("F", ["F4", "G4", "A4", "C5"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::MixolydianDominant,
        rows: &[
            ("G", ["G3", "B3", "D4", "F4"]),
            ("C", ["C3", "E3", "G3", "B-3"]),
            ("F", ["F3", "A3", "C4", "E-4"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::BebopDominant,
        rows: &[
            ("C", ["C4", "E4", "B-4", "D5"]),
            ("F", ["F4", "A4", "E-5", "G5"]),
        ],
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleDegree;

impl ChordScheme for ScaleDegree {
    fn name(&self) -> &'static str {
        "scale_degree"
    }

    fn chord_for(&self, aa: AminoAcid) -> Option<ChordId> {
        assign_chord(&FAMILIES, aa)
    }

    fn base_pitch(&self, chord: ChordId, base: char) -> Option<&'static str> {
        lookup_pitch(&TABLES, chord, base)
    }
}
