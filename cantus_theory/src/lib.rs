// Pitch, key, and chord model for the cantus melody generator.
//
// This crate is the pure data-model layer: integer pitches on the piano
// range, major/minor keys as interval patterns over a tonic, and diatonic
// chords stacked from scale degrees. It has no randomness and no I/O; the
// generation engine (`cantus_melody`) consumes it as a lookup service.
//
// Architecture:
// - `pitch.rs`: `Pitch`, a MIDI number bounded to A0..=C8, with note-name
//   parsing ("C#4", "Bb3") and checked semitone shifts
// - `key.rs`: `Key`, a tonic pitch class plus quality, with membership
//   tests and member enumeration across the playable range
// - `chord.rs`: `Chord`, with stacked-third construction, inversions, and
//   the fixed four-chord progression used for harmonic context

pub mod chord;
pub mod key;
pub mod pitch;

pub use chord::{Chord, chord_at, progression_for, seventh, triad};
pub use key::{Key, KeyQuality};
pub use pitch::{Pitch, pitch_class_name};

/// Errors from the data-model layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A note name that doesn't parse ("H4", "C#", "Cb9").
    #[error("invalid note name: {0:?}")]
    InvalidNote(String),
    /// A key name outside the supported set of 24 major/minor keys.
    #[error("unsupported key: {0:?}")]
    InvalidKey(String),
    /// A pitch or pitch shift that leaves the playable range (A0..=C8).
    #[error("pitch {midi} is outside the playable range 21..=108")]
    OutOfRange { midi: i32 },
}
