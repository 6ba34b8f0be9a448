// LilyPond sheet music output from scores.
//
// Converts a Score into a LilyPond (.ly) text file that can be engraved into
// PDF/SVG sheet music. Each track gets its own staff, named after its row
// label, with a clef chosen from its register.
//
// The approach mirrors musicxml.rs: walk each track's events with a running
// position, split at 3/8 barlines, decompose into written values and tie the
// pieces of sounding events. Chords are written `<c' e' g'>4.`, accents `->`.
//
// Uses absolute pitches (not \relative) so every note stands on its own.

use crate::error::MusicError;
use crate::notation::tied_values;
use crate::pitch::Pitch;
use crate::score::{BAR_EIGHTHS, Clef, Event, EventKind, Score, TIME_SIGNATURE, Track};
use std::fmt::Write;
use std::path::Path;

/// Convert a spelled pitch to a LilyPond absolute pitch string.
///
/// LilyPond's `c` with no octave marks = C3. Each `'` raises one octave,
/// each `,` lowers one octave. Sharps are `is`, flats `es`.
pub fn pitch_to_ly(pitch: &Pitch) -> String {
    let mut result = pitch.step().to_ascii_lowercase().to_string();
    let suffix = if pitch.alter() > 0 { "is" } else { "es" };
    for _ in 0..pitch.alter().unsigned_abs() {
        result.push_str(suffix);
    }
    let octave = pitch.octave() - 3;
    let mark = if octave > 0 { '\'' } else { ',' };
    for _ in 0..octave.unsigned_abs() {
        result.push(mark);
    }
    result
}

/// LilyPond variable name for the track at `index`: `trackA`, `trackB`, ...
/// `trackZ`, `trackAA`. Variable names may not contain digits.
fn variable_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.reverse();
    format!("track{}", letters.into_iter().collect::<String>())
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render one event starting at `start` (in eighths into the track).
fn render_event(out: &mut String, event: &Event, start: usize) {
    let values = tied_values(start, event.duration, BAR_EIGHTHS);
    let body = match &event.kind {
        EventKind::Rest => "r".to_string(),
        EventKind::Note(p) => pitch_to_ly(p),
        EventKind::Chord(ps) => {
            let notes: Vec<String> = ps.iter().map(pitch_to_ly).collect();
            format!("<{}>", notes.join(" "))
        }
    };

    for (i, value) in values.iter().enumerate() {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{}{}", body, value.ly);
        if i == 0 && event.accent {
            out.push_str("->");
        }
        if i + 1 < values.len() && !event.is_rest() {
            out.push('~');
        }
    }
}

/// Render a single track's music as a LilyPond music expression.
fn render_track_music(track: &Track) -> String {
    let mut out = String::new();
    let mut position = 0;
    for event in &track.events {
        render_event(&mut out, event, position);
        position += event.duration;
    }
    out
}

/// Generate a complete LilyPond file from a Score.
pub fn score_to_lilypond(score: &Score) -> String {
    let mut ly = String::new();

    ly.push_str("\\version \"2.24.0\"\n\n");
    let _ = write!(ly, "\\header {{\n  title = \"{}\"\n}}\n\n", escape(&score.title));

    let (beats, beat_unit) = TIME_SIGNATURE;
    let _ = write!(
        ly,
        "global = {{\n  \\time {}/{} \\tempo 4 = {}\n}}\n\n",
        beats, beat_unit, score.tempo_bpm
    );

    for (ti, track) in score.tracks.iter().enumerate() {
        let music = render_track_music(track);
        let _ = write!(
            ly,
            "{} = \\absolute {{\n  \\global\n  {}\n}}\n\n",
            variable_name(ti),
            music
        );
    }

    ly.push_str("\\score {\n  <<\n");
    for (ti, track) in score.tracks.iter().enumerate() {
        let clef = match track.clef() {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
        };
        let name = escape(&track.label);
        let _ = writeln!(
            ly,
            "    \\new Staff = \"{}\" \\with {{ instrumentName = \"{}\" }} {{\n      \\clef {}\n      \\{}\n    }}",
            name,
            name,
            clef,
            variable_name(ti)
        );
    }
    ly.push_str("  >>\n");
    ly.push_str("  \\layout { }\n");
    ly.push_str("  \\midi { }\n");
    ly.push_str("}\n");

    ly
}

/// Write a LilyPond file from a Score.
pub fn write_lilypond(score: &Score, path: &Path) -> Result<(), MusicError> {
    std::fs::write(path, score_to_lilypond(score))?;
    log::info!("Wrote LilyPond ({} staves) to {}", score.tracks.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Pitch {
        Pitch::parse(name).unwrap()
    }

    fn note(name: &str, duration: usize, accent: bool) -> Event {
        Event { kind: EventKind::Note(p(name)), duration, accent }
    }

    #[test]
    fn test_pitch_to_ly_octaves() {
        assert_eq!(pitch_to_ly(&p("C4")), "c'");
        assert_eq!(pitch_to_ly(&p("C3")), "c");
        assert_eq!(pitch_to_ly(&p("G3")), "g");
        assert_eq!(pitch_to_ly(&p("C2")), "c,");
        assert_eq!(pitch_to_ly(&p("C1")), "c,,");
        assert_eq!(pitch_to_ly(&p("C5")), "c''");
        assert_eq!(pitch_to_ly(&p("C6")), "c'''");
    }

    #[test]
    fn test_pitch_to_ly_accidentals_keep_spelling() {
        assert_eq!(pitch_to_ly(&p("C#4")), "cis'");
        assert_eq!(pitch_to_ly(&p("E-4")), "ees'");
        assert_eq!(pitch_to_ly(&p("A#4")), "ais'");
        assert_eq!(pitch_to_ly(&p("B-3")), "bes");
        assert_eq!(pitch_to_ly(&p("F##2")), "fisis,");
    }

    #[test]
    fn test_variable_names() {
        assert_eq!(variable_name(0), "trackA");
        assert_eq!(variable_name(25), "trackZ");
        assert_eq!(variable_name(26), "trackAA");
    }

    #[test]
    fn test_render_chord_accent_and_rest() {
        let chord = Event {
            kind: EventKind::Chord(vec![p("D3"), p("F#3"), p("A#3")]),
            duration: 3,
            accent: true,
        };
        let track = Track {
            label: "SequenceX".into(),
            program: 0,
            events: vec![chord, Event { kind: EventKind::Rest, duration: 3, accent: true }],
        };
        assert_eq!(render_track_music(&track), "<d fis ais>4.-> r4.->");
    }

    #[test]
    fn test_render_tied_across_barline() {
        let track = Track {
            label: "Sequence1".into(),
            program: 0,
            events: vec![note("C4", 1, true), note("E4", 3, false)],
        };
        // The dotted quarter starts on the second eighth: quarter tied to eighth.
        assert_eq!(render_track_music(&track), "c'8-> e'4~ e'8");
    }

    #[test]
    fn test_score_to_lilypond_structure() {
        let score = Score {
            title: "Test \"Piece\"".into(),
            tempo_bpm: 72,
            tracks: vec![
                Track { label: "Sequence1".into(), program: 0, events: vec![note("A4", 1, false)] },
                Track { label: "SequenceX".into(), program: 0, events: vec![note("D3", 3, false)] },
            ],
        };
        let ly = score_to_lilypond(&score);
        assert!(ly.contains("\\version"), "Missing version: {}", ly);
        assert!(ly.contains("title = \"Test \\\"Piece\\\"\""), "Bad title: {}", ly);
        assert!(ly.contains("\\time 3/8"), "Missing time sig");
        assert!(ly.contains("\\tempo 4 = 72"), "Missing tempo");
        assert!(ly.contains("trackA = \\absolute"), "Missing variable");
        assert!(ly.contains("instrumentName = \"SequenceX\""), "Missing staff name");
        assert!(ly.contains("\\clef bass"), "Missing bass clef");
        assert!(ly.contains("\\layout"), "Missing layout block");
    }
}
