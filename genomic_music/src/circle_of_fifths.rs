// Circle-of-fifths chord scheme.
//
// Non-polar amino acids get major triads walking the circle of fifths from
// C, polar ones minor triads from A minor, basic ones diminished triads and
// acidic ones augmented triads. Roots are assigned by rank (see
// `category.rs`), so Ala -> C, Val -> G, ..., Asp -> Daug, Glu -> Eaug.
//
// Two base-pitch voicings exist. `ChordTones` spreads A, T, C, G over root,
// third, fifth and a colour tone above the root; `Compact` keeps all four
// bases within one register around middle C. Both tables are kept exactly
// as tuned, including the E major row whose G plays F4.

use crate::category::AminoCategory;
use crate::scheme::{
    ChordFamily, ChordId, ChordQuality, ChordScheme, CircleVoicing, PitchTable, assign_chord,
    lookup_pitch,
};
use genomic_music_seq::codon::AminoAcid;

static FAMILIES: [ChordFamily; 4] = [
    ChordFamily {
        category: AminoCategory::NonPolar,
        quality: ChordQuality::Major,
        roots: &["C", "G", "D", "A", "E", "B", "F#", "D-", "A-"],
    },
    ChordFamily {
        category: AminoCategory::Polar,
        quality: ChordQuality::Minor,
        roots: &["A", "E", "B", "F#", "C#", "G#"],
    },
    ChordFamily {
        category: AminoCategory::Basic,
        quality: ChordQuality::Diminished,
        roots: &["B", "F#", "C#"],
    },
    ChordFamily {
        category: AminoCategory::Acidic,
        quality: ChordQuality::Augmented,
        roots: &["D", "E"],
    },
];

static CHORD_TONE_TABLES: [PitchTable; 4] = [
    PitchTable {
        quality: ChordQuality::Major,
        rows: &[
            ("C", ["C4", "E4", "G4", "B4"]),
            ("G", ["G4", "B4", "D5", "F#5"]),
            ("D", ["D4", "F#4", "A4", "C#5"]),
            ("A", ["A4", "C#5", "E5", "G#5"]),
            ("E", ["E4", "G#4", "B4", "F4"]),
            ("B", ["B4", "D#5", "F#5", "A#5"]),
            ("F#", ["F#4", "A#4", "C#5", "E5"]),
            ("D-", ["D-4", "F4", "A-4", "C5"]),
            ("A-", ["A-4", "C5", "E-5", "G5"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::Minor,
        rows: &[
            ("A", ["A4", "C5", "E5", "G5"]),
            ("E", ["E4", "G4", "B4", "D5"]),
            ("B", ["B4", "D5", "F#5", "A5"]),
            ("F#", ["F#4", "A4", "C#5", "E5"]),
            ("C#", ["C#4", "E4", "G#4", "B4"]),
            ("G#", ["G#4", "B4", "D#5", "F#5"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::Diminished,
        rows: &[
            ("B", ["B4", "D5", "F5", "A-5"]),
            ("F#", ["F#4", "A4", "C5", "E-5"]),
            ("C#", ["C#4", "E4", "G4", "B-4"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::Augmented,
        rows: &[
            ("D", ["D4", "F#4", "A#4", "C#5"]),
            ("E", ["E4", "G#4", "C5", "D#5"]),
        ],
    },
];

static COMPACT_TABLES: [PitchTable; 4] = [
    PitchTable {
        quality: ChordQuality::Major,
        rows: &[
            ("C", ["C4", "D4", "E4", "B3"]),
            ("G", ["G4", "A4", "B3", "D4"]),
            ("D", ["D4", "E4", "F#4", "B3"]),
            ("A", ["A4", "B3", "C#4", "E4"]),
            ("E", ["E4", "F#4", "G#4", "B3"]),
            ("B", ["B4", "C#4", "D#4", "E4"]),
            ("F#", ["F#4", "G#4", "A#4", "B3"]),
            ("D-", ["D-4", "E-4", "F4", "B-3"]),
            ("A-", ["A-4", "B-3", "C4", "D4"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::Minor,
        rows: &[
            ("A", ["A4", "B3", "C4", "D4"]),
            ("E", ["E4", "F#4", "G4", "B3"]),
            ("B", ["B4", "C#4", "D4", "E4"]),
            ("F#", ["F#4", "G#4", "A4", "B3"]),
            ("C#", ["C#4", "D#4", "E4", "B3"]),
            ("G#", ["G#4", "A#4", "B4", "D4"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::Diminished,
        rows: &[
            ("B", ["B4", "D4", "F4", "B-3"]),
            ("F#", ["F#4", "A4", "C4", "B3"]),
            ("C#", ["C#4", "E4", "G4", "B-3"]),
        ],
    },
    PitchTable {
        quality: ChordQuality::Augmented,
        rows: &[
            ("D", ["D4", "F#4", "A#4", "B3"]),
            ("E", ["E4", "G#4", "C4", "B3"]),
        ],
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CircleOfFifths {
    pub voicing: CircleVoicing,
}

impl CircleOfFifths {
    pub fn new(voicing: CircleVoicing) -> Self {
        CircleOfFifths { voicing }
    }

    fn tables(&self) -> &'static [PitchTable] {
        match self.voicing {
            CircleVoicing::ChordTones => &CHORD_TONE_TABLES,
            CircleVoicing::Compact => &COMPACT_TABLES,
        }
    }
}

impl ChordScheme for CircleOfFifths {
    fn name(&self) -> &'static str {
        "circle_of_fifths"
    }

    fn chord_for(&self, aa: AminoAcid) -> Option<ChordId> {
        assign_chord(&FAMILIES, aa)
    }

    fn base_pitch(&self, chord: ChordId, base: char) -> Option<&'static str> {
        lookup_pitch(self.tables(), chord, base)
    }
}
