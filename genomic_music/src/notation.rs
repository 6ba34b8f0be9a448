// Note values shared by the notation writers.
//
// Both MusicXML and LilyPond can only express power-of-two note values with
// optional dots, and neither lets a note cross a barline. Durations (in
// eighth notes) are therefore split at barlines first and each fragment is
// decomposed into written values, largest first. Every piece after the first
// is tied to its predecessor.

/// A writable note value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteValue {
    /// Length in eighth notes.
    pub eighths: usize,
    /// LilyPond duration text.
    pub ly: &'static str,
    /// MusicXML `<type>`.
    pub xml_type: &'static str,
    pub dotted: bool,
}

const fn value(eighths: usize, ly: &'static str, xml_type: &'static str, dotted: bool) -> NoteValue {
    NoteValue { eighths, ly, xml_type, dotted }
}

/// Largest first.
const NOTE_VALUES: [NoteValue; 6] = [
    value(8, "1", "whole", false),
    value(6, "2.", "half", true),
    value(4, "2", "half", false),
    value(3, "4.", "quarter", true),
    value(2, "4", "quarter", false),
    value(1, "8", "eighth", false),
];

/// Decompose a duration (in eighths) into written values, largest first.
///
/// For example: 5 eighths = half + eighth.
pub fn decompose_duration(mut eighths: usize) -> Vec<NoteValue> {
    let mut parts = Vec::new();
    for v in NOTE_VALUES {
        while eighths >= v.eighths {
            parts.push(v);
            eighths -= v.eighths;
        }
    }
    parts
}

/// Split a duration at barlines every `bar_length` eighths.
///
/// A note starting at `start` that crosses a barline becomes fragments that
/// each fit within a single bar.
pub fn split_at_barlines(start: usize, duration: usize, bar_length: usize) -> Vec<usize> {
    let mut fragments = Vec::new();
    let mut remaining = duration;
    let mut pos = start;

    while remaining > 0 {
        let bar_end = ((pos / bar_length) + 1) * bar_length;
        let frag = remaining.min(bar_end - pos);
        fragments.push(frag);
        remaining -= frag;
        pos += frag;
    }
    fragments
}

/// The written values of an event starting at `start`, in order. All but
/// the last are tied forward when the event sounds.
pub fn tied_values(start: usize, duration: usize, bar_length: usize) -> Vec<NoteValue> {
    split_at_barlines(start, duration, bar_length)
        .into_iter()
        .flat_map(decompose_duration)
        .collect()
}
