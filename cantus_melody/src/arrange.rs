// Timed note events and sequence combinators.
//
// The builder produces abstract pitches; this module places them on a
// timeline as (pitch, start, end, velocity) events, measured in
// quarter-note beats. Sequences can be concatenated end-to-end or stacked
// on top of each other, which is how the chord accompaniment is combined
// with the melody line before MIDI output.

use cantus_theory::{Chord, Pitch};
use serde::{Deserialize, Serialize};

/// A single timed note. Times are in quarter-note beats from sequence
/// start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: Pitch,
    pub start: f64,
    pub end: f64,
    pub velocity: u8,
}

/// An ordered collection of note events with an overall duration.
/// `total_beats` may extend past the last event (trailing silence).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteSeq {
    pub events: Vec<NoteEvent>,
    pub total_beats: f64,
}

/// Render a melody as back-to-back events of equal duration.
pub fn melody_seq(pitches: &[Pitch], note_beats: f64, velocity: u8) -> NoteSeq {
    let events = pitches
        .iter()
        .enumerate()
        .map(|(i, &pitch)| NoteEvent {
            pitch,
            start: i as f64 * note_beats,
            end: (i + 1) as f64 * note_beats,
            velocity,
        })
        .collect();
    NoteSeq {
        events,
        total_beats: pitches.len() as f64 * note_beats,
    }
}

/// Render a progression as block chords of `chord_beats` each, cycling
/// through the chords until `total_beats` is covered. The final chord is
/// clipped to the sequence end.
pub fn progression_seq(
    progression: &[Chord],
    chord_beats: f64,
    velocity: u8,
    total_beats: f64,
) -> NoteSeq {
    let mut seq = NoteSeq {
        events: Vec::new(),
        total_beats: total_beats.max(0.0),
    };
    if progression.is_empty() || chord_beats <= 0.0 {
        return seq;
    }

    let mut start = 0.0;
    let mut index = 0;
    while start < seq.total_beats {
        let end = (start + chord_beats).min(seq.total_beats);
        for &pitch in &progression[index % progression.len()].pitches {
            seq.events.push(NoteEvent { pitch, start, end, velocity });
        }
        start += chord_beats;
        index += 1;
    }
    seq
}

/// Concatenate sequences end-to-end: each sequence's events are shifted by
/// the accumulated duration of everything before it.
pub fn concat(seqs: &[NoteSeq]) -> NoteSeq {
    let mut out = NoteSeq::default();
    let mut offset = 0.0;
    for seq in seqs {
        for event in &seq.events {
            out.events.push(NoteEvent {
                start: event.start + offset,
                end: event.end + offset,
                ..*event
            });
        }
        offset += seq.total_beats;
    }
    out.total_beats = offset;
    out
}

/// Stack sequences on top of each other: event times are unchanged and
/// the result lasts as long as the longest input.
pub fn stack(seqs: &[NoteSeq]) -> NoteSeq {
    let mut out = NoteSeq::default();
    for seq in seqs {
        out.events.extend_from_slice(&seq.events);
        out.total_beats = out.total_beats.max(seq.total_beats);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantus_theory::{Key, KeyQuality, progression_for};

    fn pitch(name: &str) -> Pitch {
        name.parse().unwrap()
    }

    #[test]
    fn test_melody_seq_is_back_to_back() {
        let pitches = [pitch("C4"), pitch("E4"), pitch("G4")];
        let seq = melody_seq(&pitches, 1.0, 80);
        assert_eq!(seq.events.len(), 3);
        assert_eq!(seq.total_beats, 3.0);
        for (i, event) in seq.events.iter().enumerate() {
            assert_eq!(event.start, i as f64);
            assert_eq!(event.end, i as f64 + 1.0);
            assert_eq!(event.velocity, 80);
        }
    }

    #[test]
    fn test_progression_seq_cycles_and_clips() {
        let key = Key::new(0, KeyQuality::Major);
        let progression = progression_for(key).unwrap();

        // 4 chords of 4 beats cover 16 beats; a 18-beat melody wraps back
        // to the first chord, clipped to 2 beats.
        let seq = progression_seq(&progression, 4.0, 60, 18.0);
        assert_eq!(seq.total_beats, 18.0);
        assert_eq!(seq.events.len(), 5 * 3);

        let last_chord: Vec<&NoteEvent> =
            seq.events.iter().filter(|e| e.start == 16.0).collect();
        assert_eq!(last_chord.len(), 3);
        assert!(last_chord.iter().all(|e| e.end == 18.0));
        // The wrapped chord is the I chord again.
        let first_classes: Vec<u8> =
            seq.events[..3].iter().map(|e| e.pitch.pitch_class()).collect();
        let wrapped_classes: Vec<u8> =
            last_chord.iter().map(|e| e.pitch.pitch_class()).collect();
        assert_eq!(first_classes, wrapped_classes);
    }

    #[test]
    fn test_progression_seq_degenerate_inputs() {
        let key = Key::new(7, KeyQuality::Major);
        let progression = progression_for(key).unwrap();
        assert!(progression_seq(&progression, 4.0, 60, 0.0).events.is_empty());
        assert!(progression_seq(&progression, 0.0, 60, 8.0).events.is_empty());
        assert!(progression_seq(&[], 4.0, 60, 8.0).events.is_empty());
    }

    #[test]
    fn test_concat_shifts_starts() {
        let a = melody_seq(&[pitch("C4"), pitch("D4")], 1.0, 80);
        let b = melody_seq(&[pitch("E4")], 2.0, 80);
        let joined = concat(&[a, b]);

        assert_eq!(joined.total_beats, 4.0);
        assert_eq!(joined.events.len(), 3);
        assert_eq!(joined.events[2].start, 2.0);
        assert_eq!(joined.events[2].end, 4.0);
    }

    #[test]
    fn test_stack_preserves_times() {
        let a = melody_seq(&[pitch("C4"), pitch("D4"), pitch("E4")], 1.0, 80);
        let b = melody_seq(&[pitch("C3")], 2.0, 50);
        let stacked = stack(&[a.clone(), b]);

        assert_eq!(stacked.total_beats, 3.0);
        assert_eq!(stacked.events.len(), 4);
        // Events from `a` are untouched.
        assert_eq!(&stacked.events[..3], &a.events[..]);
        // The stacked bass note still starts at 0.
        assert_eq!(stacked.events[3].start, 0.0);
    }
}
