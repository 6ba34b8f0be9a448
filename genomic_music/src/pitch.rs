// Spelled pitches.
//
// Pitch names in the row table look like `C#5`, `B-3` or `A4`: a letter,
// zero or more accidentals (`#` sharp, `-` or `b` flat) and a single octave
// digit, with C4 = MIDI 60. Spelling matters because chord tones are
// derived by interval, and an augmented fifth above D must come out as A#,
// not B-. Transposition therefore moves the letter by the interval's number
// of steps first and then fixes the accidental to hit the semitone target.
//
// Used by the mapper (root pitches, chord tones), the score assembler
// (parsing the `pitch` column) and all three writers.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Semitones above C for each natural letter.
const NATURAL_PC: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Largest accidental we will spell (double sharp / double flat).
const MAX_ALTER: i8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    #[error("empty pitch name")]
    Empty,
    #[error("invalid pitch letter {0:?}")]
    BadLetter(char),
    #[error("invalid accidental in {0:?}")]
    BadAccidental(String),
    #[error("pitch {0:?} must end in a single octave digit")]
    BadOctave(String),
    #[error("cannot spell {semitones} semitones over {steps} letter steps from {from}")]
    Unspellable { from: String, semitones: i32, steps: i32 },
}

/// A musical interval, as semitones plus letter steps (a third is two steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub semitones: i32,
    pub steps: i32,
}

impl Interval {
    pub const MINOR_THIRD: Interval = Interval { semitones: 3, steps: 2 };
    pub const MAJOR_THIRD: Interval = Interval { semitones: 4, steps: 2 };
    pub const DIMINISHED_FIFTH: Interval = Interval { semitones: 6, steps: 4 };
    pub const PERFECT_FIFTH: Interval = Interval { semitones: 7, steps: 4 };
    pub const AUGMENTED_FIFTH: Interval = Interval { semitones: 8, steps: 4 };
    pub const MINOR_SEVENTH: Interval = Interval { semitones: 10, steps: 6 };
    pub const MAJOR_NINTH: Interval = Interval { semitones: 14, steps: 8 };
}

/// A spelled pitch with octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    /// Index into C D E F G A B.
    letter: u8,
    /// Accidental: +1 sharp, -1 flat.
    alter: i8,
    octave: i8,
}

impl Pitch {
    pub fn parse(s: &str) -> Result<Pitch, PitchError> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(PitchError::Empty)?;
        let letter = LETTERS
            .iter()
            .position(|&l| l == first.to_ascii_uppercase())
            .ok_or(PitchError::BadLetter(first))? as u8;

        let rest: &str = chars.as_str();
        let (accidentals, octave) = match rest.char_indices().last() {
            Some((i, c)) => match c.to_digit(10) {
                Some(digit) => (&rest[..i], digit as i8),
                None => return Err(PitchError::BadOctave(s.to_string())),
            },
            None => return Err(PitchError::BadOctave(s.to_string())),
        };

        let mut alter: i8 = 0;
        for c in accidentals.chars() {
            alter += match c {
                '#' => 1,
                '-' | 'b' => -1,
                _ => return Err(PitchError::BadAccidental(s.to_string())),
            };
            if alter.abs() > MAX_ALTER {
                return Err(PitchError::BadAccidental(s.to_string()));
            }
        }

        Ok(Pitch {
            letter,
            alter,
            octave,
        })
    }

    /// Letter name, `C`..`B`.
    pub fn step(&self) -> char {
        LETTERS[self.letter as usize]
    }

    pub fn alter(&self) -> i8 {
        self.alter
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// MIDI note number, C4 = 60. May fall outside 0..=127.
    pub fn midi_number(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + NATURAL_PC[self.letter as usize] + self.alter as i32
    }

    /// MIDI key, if representable.
    pub fn to_midi(&self) -> Option<u8> {
        u8::try_from(self.midi_number()).ok().filter(|&k| k <= 127)
    }

    /// Move up by `interval`, keeping a correct spelling.
    pub fn transpose(&self, interval: Interval) -> Result<Pitch, PitchError> {
        let letter_index = self.letter as i32 + interval.steps;
        let letter = letter_index.rem_euclid(7);
        let octave = self.octave as i32 + letter_index.div_euclid(7);
        let natural = (octave + 1) * 12 + NATURAL_PC[letter as usize];
        let alter = self.midi_number() + interval.semitones - natural;

        if alter.abs() > MAX_ALTER as i32 || !(0..=9).contains(&octave) {
            return Err(PitchError::Unspellable {
                from: self.to_string(),
                semitones: interval.semitones,
                steps: interval.steps,
            });
        }
        Ok(Pitch {
            letter: letter as u8,
            alter: alter as i8,
            octave: octave as i8,
        })
    }

    /// Pitch name without octave, e.g. `F#` or `B-`.
    pub fn name(&self) -> String {
        let mut out = String::new();
        out.push(self.step());
        let accidental = if self.alter > 0 { '#' } else { '-' };
        for _ in 0..self.alter.unsigned_abs() {
            out.push(accidental);
        }
        out
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave)
    }
}

impl FromStr for Pitch {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::parse(s)
    }
}

/// Parse a whitespace-separated pitch list, as stored in the `pitch` column.
pub fn parse_pitch_list(s: &str) -> Result<Vec<Pitch>, PitchError> {
    s.split_whitespace().map(Pitch::parse).collect()
}

/// Format pitches for the `pitch` column.
pub fn format_pitch_list(pitches: &[Pitch]) -> String {
    pitches
        .iter()
        .map(Pitch::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Pitch {
        Pitch::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        for name in ["C4", "C#5", "B-3", "A4", "F##2", "E--6"] {
            assert_eq!(p(name).to_string(), name);
        }
        // `b` is accepted as a flat and normalised to `-`.
        assert_eq!(p("Eb4").to_string(), "E-4");
        assert_eq!(p(" g4 ").to_string(), "G4");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Pitch::parse(""), Err(PitchError::Empty));
        assert_eq!(Pitch::parse("H4"), Err(PitchError::BadLetter('H')));
        assert!(matches!(Pitch::parse("C"), Err(PitchError::BadOctave(_))));
        assert!(matches!(Pitch::parse("C10"), Err(PitchError::BadAccidental(_))));
        assert!(matches!(Pitch::parse("C?4"), Err(PitchError::BadAccidental(_))));
        assert!(matches!(Pitch::parse("C###4"), Err(PitchError::BadAccidental(_))));
    }

    #[test]
    fn test_midi_numbers() {
        assert_eq!(p("C4").midi_number(), 60);
        assert_eq!(p("A4").midi_number(), 69);
        assert_eq!(p("B-3").midi_number(), 58);
        assert_eq!(p("C#5").midi_number(), 73);
        assert_eq!(p("C-0").to_midi(), Some(11));
        assert_eq!(p("G9").to_midi(), Some(127));
        assert_eq!(p("G#9").to_midi(), None);
    }

    #[test]
    fn test_transpose_spells_by_letter() {
        let d = p("D4");
        assert_eq!(d.transpose(Interval::MAJOR_THIRD).unwrap().to_string(), "F#4");
        assert_eq!(d.transpose(Interval::AUGMENTED_FIFTH).unwrap().to_string(), "A#4");
        let b = p("B3");
        assert_eq!(b.transpose(Interval::MINOR_THIRD).unwrap().to_string(), "D4");
        assert_eq!(b.transpose(Interval::DIMINISHED_FIFTH).unwrap().to_string(), "F4");
        let d_flat = p("D-3");
        assert_eq!(d_flat.transpose(Interval::PERFECT_FIFTH).unwrap().to_string(), "A-3");
        assert_eq!(p("C4").transpose(Interval::MAJOR_NINTH).unwrap().to_string(), "D5");
        assert_eq!(p("C4").transpose(Interval::MINOR_SEVENTH).unwrap().to_string(), "B-4");
    }

    #[test]
    fn test_transpose_preserves_semitones() {
        let intervals = [
            Interval::MINOR_THIRD,
            Interval::MAJOR_THIRD,
            Interval::DIMINISHED_FIFTH,
            Interval::PERFECT_FIFTH,
            Interval::AUGMENTED_FIFTH,
            Interval::MINOR_SEVENTH,
            Interval::MAJOR_NINTH,
        ];
        for root in ["C3", "F#3", "A-3", "G#3", "E3", "B-3"] {
            let root = p(root);
            for iv in intervals {
                let up = root.transpose(iv).unwrap();
                assert_eq!(up.midi_number() - root.midi_number(), iv.semitones, "{root} + {iv:?}");
            }
        }
    }

    #[test]
    fn test_transpose_out_of_octave_range() {
        assert!(matches!(
            p("A9").transpose(Interval::PERFECT_FIFTH),
            Err(PitchError::Unspellable { .. })
        ));
    }

    #[test]
    fn test_pitch_lists() {
        let list = parse_pitch_list("C4 E4  G4").unwrap();
        assert_eq!(format_pitch_list(&list), "C4 E4 G4");
        assert!(parse_pitch_list("").unwrap().is_empty());
        assert!(parse_pitch_list("C4 X4").is_err());
    }
}
