// MIDI output from scores.
//
// Converts a Score into a Standard MIDI File (SMF) for playback. Track 0
// carries tempo and the 3/8 time signature; each score track follows as its
// own MIDI track with a name, a program change and its notes. Chords start
// and stop all their keys together. Accented events play louder.
//
// Channels are assigned by track index, skipping channel 10 (index 9), which
// General MIDI reserves for percussion.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1 (multi-track).

use crate::error::MusicError;
use crate::score::{Score, TIME_SIGNATURE};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Ticks per eighth note (half a quarter note).
const TICKS_PER_EIGHTH: u32 = TICKS_PER_QUARTER as u32 / 2;

const VELOCITY: u8 = 80;
const ACCENT_VELOCITY: u8 = 110;

/// Last tick a track may reach; every delta then fits in 28 bits.
const MAX_TICK: u32 = (1 << 28) - 1;

/// Slowest tempo whose microseconds-per-quarter fits in 24 bits.
const MIN_TEMPO_BPM: u16 = 4;

/// Channel index General MIDI reserves for drums.
const DRUM_CHANNEL: u8 = 9;

/// MIDI channel (0-based) for the track at `index`.
pub fn channel_for_track(index: usize) -> u8 {
    let channel = (index % 15) as u8;
    if channel >= DRUM_CHANNEL { channel + 1 } else { channel }
}

/// Convert a Score to MIDI and write to a file.
pub fn write_midi(score: &Score, path: &Path) -> Result<(), MusicError> {
    let smf = score_to_smf(score);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)?;
    log::info!("Wrote MIDI ({} tracks) to {}", smf.tracks.len(), path.display());
    Ok(())
}

fn midi_event(delta: u32, channel: u4, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi { channel, message },
    }
}

fn meta_event(delta: u32, message: MetaMessage<'_>) -> TrackEvent<'_> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(message),
    }
}

/// Length in ticks of an event starting at `start`, if it ends by `MAX_TICK`.
fn event_ticks(eighths: usize, start: u32) -> Option<u32> {
    u32::try_from(eighths)
        .ok()
        .and_then(|e| e.checked_mul(TICKS_PER_EIGHTH))
        .filter(|&length| start.checked_add(length).is_some_and(|end| end <= MAX_TICK))
}

/// Convert a Score to an in-memory SMF. Track names borrow from the score.
pub fn score_to_smf(score: &Score) -> Smf<'_> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo and meter
    let tempo_microseconds = 60_000_000 / u32::from(score.tempo_bpm.max(MIN_TEMPO_BPM));
    let (beats, beat_unit) = TIME_SIGNATURE;
    let tempo_track: Track<'_> = vec![
        meta_event(0, MetaMessage::Tempo(u24::new(tempo_microseconds))),
        // Denominator as a power of two; one click per dotted quarter (36 clocks).
        meta_event(
            0,
            MetaMessage::TimeSignature(beats, beat_unit.trailing_zeros() as u8, 36, 8),
        ),
        meta_event(0, MetaMessage::EndOfTrack),
    ];
    smf.tracks.push(tempo_track);

    for (ti, score_track) in score.tracks.iter().enumerate() {
        let channel = u4::new(channel_for_track(ti));
        let mut track: Track<'_> = vec![
            meta_event(0, MetaMessage::TrackName(score_track.label.as_bytes())),
            midi_event(
                0,
                channel,
                MidiMessage::ProgramChange {
                    program: u7::new(score_track.program.min(127)),
                },
            ),
        ];

        let mut current_tick: u32 = 0;
        let mut last_event_tick: u32 = 0;

        for (ei, event) in score_track.events.iter().enumerate() {
            let Some(length) = event_ticks(event.duration, current_tick) else {
                log::warn!(
                    "{}: event {} ({} eighths) runs past the longest MIDI track, truncating",
                    score_track.label,
                    ei,
                    event.duration
                );
                break;
            };
            let keys: Vec<u8> = event
                .pitches()
                .iter()
                .filter_map(|p| {
                    let key = p.to_midi();
                    if key.is_none() {
                        log::warn!("{}: {} is outside the MIDI range, dropped", score_track.label, p);
                    }
                    key
                })
                .collect();

            if !keys.is_empty() {
                let vel = if event.accent { ACCENT_VELOCITY } else { VELOCITY };
                for (i, &key) in keys.iter().enumerate() {
                    let delta = if i == 0 { current_tick - last_event_tick } else { 0 };
                    track.push(midi_event(
                        delta,
                        channel,
                        MidiMessage::NoteOn {
                            key: u7::new(key),
                            vel: u7::new(vel),
                        },
                    ));
                }
                for (i, &key) in keys.iter().enumerate() {
                    let delta = if i == 0 { length } else { 0 };
                    track.push(midi_event(
                        delta,
                        channel,
                        MidiMessage::NoteOff {
                            key: u7::new(key),
                            vel: u7::new(0),
                        },
                    ));
                }
                last_event_tick = current_tick + length;
            }
            current_tick += length;
        }

        // Trailing rests still count toward the track length.
        track.push(meta_event(current_tick - last_event_tick, MetaMessage::EndOfTrack));
        smf.tracks.push(track);
    }

    smf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Pitch;
    use crate::score::{Event, EventKind, Track as ScoreTrack};

    fn note(name: &str, duration: usize, accent: bool) -> Event {
        Event {
            kind: EventKind::Note(Pitch::parse(name).unwrap()),
            duration,
            accent,
        }
    }

    fn rest(duration: usize) -> Event {
        Event { kind: EventKind::Rest, duration, accent: false }
    }

    fn score(tracks: Vec<ScoreTrack>) -> Score {
        Score { title: "t".into(), tempo_bpm: 72, tracks }
    }

    fn track(label: &str, events: Vec<Event>) -> ScoreTrack {
        ScoreTrack { label: label.into(), program: 0, events }
    }

    fn note_ons(track: &Track<'_>) -> Vec<(u32, u8, u8)> {
        track
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi { message: MidiMessage::NoteOn { key, vel }, .. } => {
                    Some((e.delta.as_int(), key.as_int(), vel.as_int()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_score_to_smf_basic() {
        let s = score(vec![
            track("Sequence1", vec![note("C4", 1, true), rest(1), note("E4", 1, false)]),
            track("SequenceX", vec![note("C3", 3, false)]),
        ]);
        let smf = score_to_smf(&s);
        // 1 tempo track + 2 score tracks
        assert_eq!(smf.tracks.len(), 3);

        let ons = note_ons(&smf.tracks[1]);
        assert_eq!(ons, vec![(0, 60, ACCENT_VELOCITY), (TICKS_PER_EIGHTH, 64, VELOCITY)]);
    }

    #[test]
    fn test_chord_keys_start_together() {
        let chord = Event {
            kind: EventKind::Chord(vec![
                Pitch::parse("D3").unwrap(),
                Pitch::parse("F#3").unwrap(),
                Pitch::parse("A#3").unwrap(),
            ]),
            duration: 3,
            accent: false,
        };
        let s = score(vec![track("SequenceX", vec![rest(3), chord])]);
        let smf = score_to_smf(&s);
        let ons = note_ons(&smf.tracks[1]);
        assert_eq!(
            ons,
            vec![(3 * TICKS_PER_EIGHTH, 50, VELOCITY), (0, 54, VELOCITY), (0, 58, VELOCITY)]
        );
    }

    #[test]
    fn test_track_length_includes_trailing_rest() {
        let s = score(vec![track("Sequence1", vec![note("C4", 1, false), rest(2)])]);
        let smf = score_to_smf(&s);
        let total: u32 = smf.tracks[1].iter().map(|e| e.delta.as_int()).sum();
        assert_eq!(total, 3 * TICKS_PER_EIGHTH);
    }

    #[test]
    fn test_overlong_event_truncates_track() {
        let s = score(vec![track(
            "Sequence1",
            vec![note("C4", 1, false), note("E4", 40_000_000, false), note("G4", 1, false)],
        )]);
        let smf = score_to_smf(&s);
        assert_eq!(note_ons(&smf.tracks[1]), vec![(0, 60, VELOCITY)]);
        let total: u32 = smf.tracks[1].iter().map(|e| e.delta.as_int()).sum();
        assert_eq!(total, TICKS_PER_EIGHTH);
    }

    #[test]
    fn test_event_ticks_bounds() {
        assert_eq!(event_ticks(3, 0), Some(3 * TICKS_PER_EIGHTH));
        assert_eq!(event_ticks(1, MAX_TICK), None);
        assert_eq!(event_ticks(usize::MAX, 0), None);
    }

    #[test]
    fn test_slow_tempo_is_clamped() {
        let mut s = score(vec![track("Sequence1", vec![note("A4", 1, false)])]);
        s.tempo_bpm = 1;
        let smf = score_to_smf(&s);
        match smf.tracks[0][0].kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => assert_eq!(t.as_int(), 15_000_000),
            ref other => panic!("expected tempo, got {:?}", other),
        }
    }

    #[test]
    fn test_channels_skip_drums() {
        let channels: Vec<u8> = (0..17).map(channel_for_track).collect();
        assert!(!channels.contains(&DRUM_CHANNEL));
        assert_eq!(channels[8], 8);
        assert_eq!(channels[9], 10);
        assert_eq!(channels[14], 15);
        assert_eq!(channels[15], 0);
    }

    #[test]
    fn test_write_midi_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");
        write_midi(&score(vec![track("Sequence1", vec![note("A4", 1, false)])]), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
        let parsed = Smf::parse(&bytes).unwrap();
        assert_eq!(parsed.tracks.len(), 2);
    }
}
