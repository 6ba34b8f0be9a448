// MusicXML output from scores.
//
// The primary interchange format: a partwise MusicXML 4.0 document with one
// part per track. Divisions are two per quarter, so one eighth note is one
// division and event durations are written unchanged.
//
// Each track is walked with a running position in eighths. A new measure
// opens on every 3/8 barline; events that cross one are split into tied
// notes (`<tie>` for playback, `<tied>` for engraving). Chord members after
// the first carry `<chord/>`. The last measure is padded with rests so every
// measure is complete.
//
// The first measure of every part carries the attributes (divisions, key,
// time, clef); the first part also carries the tempo marking. Elements go
// through quick-xml's event writer, which handles escaping and indentation.

use crate::error::MusicError;
use crate::midi::channel_for_track;
use crate::notation::{NoteValue, decompose_duration, tied_values};
use crate::pitch::Pitch;
use crate::score::{BAR_EIGHTHS, Clef, Event, Score, TIME_SIGNATURE, Track};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use std::path::Path;

/// Divisions per quarter note.
const DIVISIONS: usize = 2;

const DOCTYPE: &str = r#"score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd""#;

type XmlWriter = Writer<Vec<u8>>;

fn open(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<(), MusicError> {
    let mut start = BytesStart::new(name);
    for &attr in attrs {
        start.push_attribute(attr);
    }
    w.write_event(XmlEvent::Start(start))?;
    Ok(())
}

fn close(w: &mut XmlWriter, name: &str) -> Result<(), MusicError> {
    w.write_event(XmlEvent::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<(), MusicError> {
    let mut start = BytesStart::new(name);
    for &attr in attrs {
        start.push_attribute(attr);
    }
    w.write_event(XmlEvent::Empty(start))?;
    Ok(())
}

/// `<name>text</name>`, with the text escaped.
fn text(w: &mut XmlWriter, name: &str, content: &str) -> Result<(), MusicError> {
    w.create_element(name)
        .write_text_content(BytesText::new(content))?;
    Ok(())
}

fn part_id(index: usize) -> String {
    format!("P{}", index + 1)
}

/// Where a written note sits in a chain of tied notes.
#[derive(Debug, Clone, Copy, Default)]
struct Ties {
    stop: bool,
    start: bool,
}

/// One `<note>` element. `pitch` is `None` for a rest.
fn write_note(
    w: &mut XmlWriter,
    pitch: Option<&Pitch>,
    in_chord: bool,
    value: NoteValue,
    ties: Ties,
    accent: bool,
) -> Result<(), MusicError> {
    open(w, "note", &[])?;
    if in_chord {
        empty(w, "chord", &[])?;
    }
    match pitch {
        Some(p) => {
            open(w, "pitch", &[])?;
            text(w, "step", &p.step().to_string())?;
            if p.alter() != 0 {
                text(w, "alter", &p.alter().to_string())?;
            }
            text(w, "octave", &p.octave().to_string())?;
            close(w, "pitch")?;
        }
        None => empty(w, "rest", &[])?,
    }
    text(w, "duration", &value.eighths.to_string())?;
    if ties.stop {
        empty(w, "tie", &[("type", "stop")])?;
    }
    if ties.start {
        empty(w, "tie", &[("type", "start")])?;
    }
    text(w, "voice", "1")?;
    text(w, "type", value.xml_type)?;
    if value.dotted {
        empty(w, "dot", &[])?;
    }
    if ties.stop || ties.start || accent {
        open(w, "notations", &[])?;
        if ties.stop {
            empty(w, "tied", &[("type", "stop")])?;
        }
        if ties.start {
            empty(w, "tied", &[("type", "start")])?;
        }
        if accent {
            open(w, "articulations", &[])?;
            empty(w, "accent", &[])?;
            close(w, "articulations")?;
        }
        close(w, "notations")?;
    }
    close(w, "note")
}

/// Writes one part, opening measures at barlines as the position advances.
struct PartWriter<'a> {
    w: &'a mut XmlWriter,
    clef: Clef,
    tempo_bpm: Option<u16>,
    position: usize,
    measures: usize,
}

impl PartWriter<'_> {
    /// Open a new measure if `position` sits on a barline.
    fn at_barline(&mut self) -> Result<(), MusicError> {
        if self.position % BAR_EIGHTHS != 0 {
            return Ok(());
        }
        if self.measures > 0 {
            close(self.w, "measure")?;
        }
        self.measures += 1;
        open(self.w, "measure", &[("number", self.measures.to_string().as_str())])?;
        if self.measures == 1 {
            self.write_attributes()?;
        }
        Ok(())
    }

    fn write_attributes(&mut self) -> Result<(), MusicError> {
        let (beats, beat_unit) = TIME_SIGNATURE;
        let (sign, line) = match self.clef {
            Clef::Treble => ("G", "2"),
            Clef::Bass => ("F", "4"),
        };
        let w = &mut *self.w;
        open(w, "attributes", &[])?;
        text(w, "divisions", &DIVISIONS.to_string())?;
        open(w, "key", &[])?;
        text(w, "fifths", "0")?;
        close(w, "key")?;
        open(w, "time", &[])?;
        text(w, "beats", &beats.to_string())?;
        text(w, "beat-type", &beat_unit.to_string())?;
        close(w, "time")?;
        open(w, "clef", &[])?;
        text(w, "sign", sign)?;
        text(w, "line", line)?;
        close(w, "clef")?;
        close(w, "attributes")?;

        if let Some(bpm) = self.tempo_bpm {
            let bpm = bpm.to_string();
            open(w, "direction", &[("placement", "above")])?;
            open(w, "direction-type", &[])?;
            open(w, "metronome", &[])?;
            text(w, "beat-unit", "quarter")?;
            text(w, "per-minute", &bpm)?;
            close(w, "metronome")?;
            close(w, "direction-type")?;
            empty(w, "sound", &[("tempo", bpm.as_str())])?;
            close(w, "direction")?;
        }
        Ok(())
    }

    fn event(&mut self, event: &Event) -> Result<(), MusicError> {
        let values = tied_values(self.position, event.duration, BAR_EIGHTHS);
        let last = values.len().saturating_sub(1);
        for (i, &value) in values.iter().enumerate() {
            self.at_barline()?;
            let accent = i == 0 && event.accent;
            if event.is_rest() {
                write_note(self.w, None, false, value, Ties::default(), accent)?;
            } else {
                let ties = Ties { stop: i > 0, start: i < last };
                for (k, pitch) in event.pitches().iter().enumerate() {
                    write_note(self.w, Some(pitch), k > 0, value, ties, accent && k == 0)?;
                }
            }
            self.position += value.eighths;
        }
        Ok(())
    }

    /// Pad the final measure with rests and close it.
    fn finish(mut self) -> Result<(), MusicError> {
        let padding = if self.measures == 0 {
            self.at_barline()?;
            BAR_EIGHTHS
        } else {
            (BAR_EIGHTHS - self.position % BAR_EIGHTHS) % BAR_EIGHTHS
        };
        for value in decompose_duration(padding) {
            write_note(self.w, None, false, value, Ties::default(), false)?;
        }
        close(self.w, "measure")
    }
}

fn write_part(
    w: &mut XmlWriter,
    track: &Track,
    index: usize,
    tempo_bpm: Option<u16>,
) -> Result<(), MusicError> {
    open(w, "part", &[("id", part_id(index).as_str())])?;
    let mut part = PartWriter {
        w: &mut *w,
        clef: track.clef(),
        tempo_bpm,
        position: 0,
        measures: 0,
    };
    for event in &track.events {
        part.event(event)?;
    }
    part.finish()?;
    close(w, "part")
}

fn write_part_list(w: &mut XmlWriter, score: &Score) -> Result<(), MusicError> {
    open(w, "part-list", &[])?;
    for (i, track) in score.tracks.iter().enumerate() {
        let id = part_id(i);
        let instrument = format!("{id}-I1");
        open(w, "score-part", &[("id", id.as_str())])?;
        text(w, "part-name", &track.label)?;
        open(w, "score-instrument", &[("id", instrument.as_str())])?;
        text(w, "instrument-name", &track.label)?;
        close(w, "score-instrument")?;
        open(w, "midi-instrument", &[("id", instrument.as_str())])?;
        text(w, "midi-channel", &(channel_for_track(i) + 1).to_string())?;
        text(w, "midi-program", &(u16::from(track.program) + 1).to_string())?;
        close(w, "midi-instrument")?;
        close(w, "score-part")?;
    }
    close(w, "part-list")
}

/// Render the whole score as a MusicXML document.
pub fn score_to_musicxml(score: &Score) -> Result<String, MusicError> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(XmlEvent::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    w.write_event(XmlEvent::DocType(BytesText::from_escaped(DOCTYPE)))?;

    open(&mut w, "score-partwise", &[("version", "4.0")])?;
    open(&mut w, "work", &[])?;
    text(&mut w, "work-title", &score.title)?;
    close(&mut w, "work")?;
    open(&mut w, "identification", &[])?;
    open(&mut w, "encoding", &[])?;
    text(&mut w, "software", "genomic-music")?;
    close(&mut w, "encoding")?;
    close(&mut w, "identification")?;
    write_part_list(&mut w, score)?;
    for (i, track) in score.tracks.iter().enumerate() {
        let tempo = (i == 0).then_some(score.tempo_bpm);
        write_part(&mut w, track, i, tempo)?;
    }
    close(&mut w, "score-partwise")?;

    let mut xml = String::from_utf8_lossy(&w.into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

/// Write a MusicXML file from a Score.
pub fn write_musicxml(score: &Score, path: &Path) -> Result<(), MusicError> {
    std::fs::write(path, score_to_musicxml(score)?)?;
    log::info!("Wrote MusicXML ({} parts) to {}", score.tracks.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::EventKind;

    fn p(name: &str) -> Pitch {
        Pitch::parse(name).unwrap()
    }

    fn single_track(events: Vec<Event>) -> Score {
        Score {
            title: "Genes & Codons".into(),
            tempo_bpm: 72,
            tracks: vec![Track { label: "Sequence1".into(), program: 0, events }],
        }
    }

    #[test]
    fn test_document_skeleton() {
        let xml = score_to_musicxml(&single_track(vec![Event {
            kind: EventKind::Note(p("C#5")),
            duration: 1,
            accent: true,
        }]))
        .unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<score-partwise version=\"4.0\">"));
        assert!(xml.contains("<work-title>Genes &amp; Codons</work-title>"));
        assert!(xml.contains("<part-name>Sequence1</part-name>"));
        assert!(xml.contains("<midi-program>1</midi-program>"));
        assert!(xml.contains("<beats>3</beats>"));
        assert!(xml.contains("<beat-type>8</beat-type>"));
        assert!(xml.contains("<per-minute>72</per-minute>"));
        assert!(xml.contains("<step>C</step>"));
        assert!(xml.contains("<alter>1</alter>"));
        assert!(xml.contains("<octave>5</octave>"));
        assert!(xml.contains("<accent/>"));
        assert!(xml.trim_end().ends_with("</score-partwise>"));
    }

    #[test]
    fn test_last_measure_is_padded() {
        let xml = score_to_musicxml(&single_track(vec![Event {
            kind: EventKind::Note(p("A4")),
            duration: 1,
            accent: false,
        }]))
        .unwrap();
        assert_eq!(xml.matches("<measure ").count(), 1);
        // One note plus a quarter rest completing the bar.
        assert_eq!(xml.matches("<note>").count(), 2);
        assert_eq!(xml.matches("<rest/>").count(), 1);
        assert!(xml.contains("<type>quarter</type>"));
    }

    #[test]
    fn test_barline_split_uses_ties() {
        let xml = score_to_musicxml(&single_track(vec![
            Event { kind: EventKind::Note(p("C4")), duration: 1, accent: false },
            Event { kind: EventKind::Note(p("E4")), duration: 3, accent: false },
        ]))
        .unwrap();
        assert_eq!(xml.matches("<measure ").count(), 2);
        assert_eq!(xml.matches("<tie type=\"start\"/>").count(), 1);
        assert_eq!(xml.matches("<tie type=\"stop\"/>").count(), 1);
        assert_eq!(xml.matches("<tied type=\"start\"/>").count(), 1);
    }

    #[test]
    fn test_chord_members_marked() {
        let xml = score_to_musicxml(&single_track(vec![Event {
            kind: EventKind::Chord(vec![p("D3"), p("F#3"), p("A#3")]),
            duration: 3,
            accent: false,
        }]))
        .unwrap();
        assert_eq!(xml.matches("<chord/>").count(), 2);
        assert_eq!(xml.matches("<dot/>").count(), 3);
        assert_eq!(xml.matches("<measure ").count(), 1);
        // Low chord reads in bass clef.
        assert!(xml.contains("<sign>F</sign>"));
    }

    #[test]
    fn test_empty_track_gets_a_rest_measure() {
        let xml = score_to_musicxml(&single_track(Vec::new())).unwrap();
        assert_eq!(xml.matches("<measure ").count(), 1);
        assert_eq!(xml.matches("<rest/>").count(), 1);
        assert!(xml.contains("<attributes>"));
    }

    #[test]
    fn test_rests_are_not_tied_but_keep_accents() {
        let xml = score_to_musicxml(&single_track(vec![
            Event { kind: EventKind::Rest, duration: 2, accent: true },
            Event { kind: EventKind::Rest, duration: 4, accent: false },
        ]))
        .unwrap();
        assert!(!xml.contains("<tie "));
        // The accented rest carries its accent on its first written piece only.
        assert_eq!(xml.matches("<accent/>").count(), 1);
        assert_eq!(xml.matches("<measure ").count(), 2);
    }
}
