// Standard MIDI File output.
//
// Converts timed note sequences into an SMF format 1 file: a tempo meta
// track plus one named track per part. Event times in beats are mapped to
// MIDI ticks at 480 per quarter note. Unlike a strictly monophonic line,
// a part may contain simultaneous events (block chords), so each track is
// built from a tick-sorted list of note-on/note-off moments.

use crate::arrange::NoteSeq;
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Write named parts as a MIDI file.
pub fn write_midi(
    parts: &[(&str, &NoteSeq)],
    tempo_bpm: u16,
    path: &Path,
) -> Result<(), crate::Error> {
    let smf = to_smf(parts, tempo_bpm);
    smf.save(path)?;
    Ok(())
}

/// Build an in-memory SMF from named parts.
fn to_smf<'a>(parts: &[(&'a str, &NoteSeq)], tempo_bpm: u16) -> Smf<'a> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo. The SMF tempo field is 24-bit microseconds per
    // quarter, which caps out below 4 BPM.
    let tempo_microseconds = 60_000_000 / u32::from(tempo_bpm.max(4));
    let mut tempo_track: Track<'static> = Vec::new();
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    for (index, (name, seq)) in parts.iter().enumerate() {
        let channel = u4::new((index % 16) as u8);
        smf.tracks.push(seq_to_track(name, seq, channel));
    }

    smf
}

fn seq_to_track<'a>(name: &'a str, seq: &NoteSeq, channel: u4) -> Track<'a> {
    let mut track: Track<'a> = Vec::new();

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::TrackName(name.as_bytes())),
    });
    // Acoustic grand on every part.
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange { program: u7::new(0) },
        },
    });

    // Expand events into absolute-tick on/off moments. Offs sort before
    // ons at the same tick so repeated pitches re-attack cleanly.
    let mut moments: Vec<(u32, bool, u8, u8)> = Vec::new();
    for event in &seq.events {
        let on = beats_to_ticks(event.start);
        let off = beats_to_ticks(event.end).max(on + 1);
        moments.push((on, true, event.pitch.midi(), event.velocity));
        moments.push((off, false, event.pitch.midi(), 0));
    }
    moments.sort_by_key(|&(tick, is_on, key, _)| (tick, is_on, key));

    let mut last_tick = 0u32;
    for (tick, is_on, key, velocity) in moments {
        let delta = tick - last_tick;
        last_tick = tick;
        let message = if is_on {
            MidiMessage::NoteOn { key: u7::new(key), vel: u7::new(velocity) }
        } else {
            MidiMessage::NoteOff { key: u7::new(key), vel: u7::new(0) }
        };
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi { channel, message },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    track
}

fn beats_to_ticks(beats: f64) -> u32 {
    (beats * f64::from(TICKS_PER_QUARTER)).round() as u32
}
