// Integer pitch model on the piano range.
//
// A `Pitch` wraps a MIDI note number and is guaranteed to lie on the
// playable range A0 (21) through C8 (108). All arithmetic that could leave
// the range goes through `shift`, which fails instead of wrapping, so a
// `Pitch` in hand is always playable.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of semitones per octave.
pub const SEMITONES_PER_OCTAVE: u8 = 12;

/// Display names for the 12 pitch classes, C through B.
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// A playable note, identified by its MIDI number.
///
/// Equality and ordering are by integer value. The valid range is the
/// 88-key piano: A0 (MIDI 21) through C8 (MIDI 108).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pitch(u8);

impl Pitch {
    /// MIDI number of the lowest playable pitch (A0).
    pub const LOWEST_MIDI: u8 = 21;
    /// MIDI number of the highest playable pitch (C8).
    pub const HIGHEST_MIDI: u8 = 108;

    /// The lowest playable pitch, A0.
    pub const LOWEST: Pitch = Pitch(Self::LOWEST_MIDI);
    /// The highest playable pitch, C8.
    pub const HIGHEST: Pitch = Pitch(Self::HIGHEST_MIDI);

    /// Construct a pitch from a MIDI number, failing if it is outside the
    /// playable range.
    pub fn new(midi: i32) -> Result<Self, Error> {
        if (Self::LOWEST_MIDI as i32..=Self::HIGHEST_MIDI as i32).contains(&midi) {
            Ok(Pitch(midi as u8))
        } else {
            Err(Error::OutOfRange { midi })
        }
    }

    /// The MIDI note number.
    pub fn midi(self) -> u8 {
        self.0
    }

    /// The pitch class (0 = C, 1 = C#, ... 11 = B).
    pub fn pitch_class(self) -> u8 {
        self.0 % SEMITONES_PER_OCTAVE
    }

    /// The octave in scientific pitch notation (C4 = middle C = MIDI 60).
    pub fn octave(self) -> i32 {
        self.0 as i32 / SEMITONES_PER_OCTAVE as i32 - 1
    }

    /// Shift by a signed number of semitones, failing if the result leaves
    /// the playable range.
    pub fn shift(self, semitones: i32) -> Result<Self, Error> {
        Pitch::new(self.0 as i32 + semitones)
    }

    /// Construct a pitch from a pitch class and an octave.
    /// `from_class_octave(0, 4)` is middle C.
    pub fn from_class_octave(pitch_class: u8, octave: i32) -> Result<Self, Error> {
        Pitch::new((octave + 1) * SEMITONES_PER_OCTAVE as i32 + (pitch_class % SEMITONES_PER_OCTAVE) as i32)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", pitch_class_name(self.pitch_class()), self.octave())
    }
}

impl FromStr for Pitch {
    type Err = Error;

    /// Parse a note name like "A4", "C#4", or "Gb3".
    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidNote(s.to_string());
        let digits_at = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let class = parse_pitch_class(&s[..digits_at]).ok_or_else(invalid)?;
        let octave: i32 = s[digits_at..].parse().map_err(|_| invalid())?;
        Pitch::from_class_octave(class, octave)
    }
}

/// The display name of a pitch class ("C", "C#", "Eb", ...).
pub fn pitch_class_name(pitch_class: u8) -> &'static str {
    PITCH_CLASS_NAMES[(pitch_class % SEMITONES_PER_OCTAVE) as usize]
}

/// Parse a pitch-class name: a letter A-G with an optional '#' or 'b'.
/// Both spellings of each accidental are accepted ("D#" and "Eb" are the
/// same class).
pub fn parse_pitch_class(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    let base: i32 = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let accidental: i32 = match chars.next() {
        None => 0,
        Some('#') => 1,
        Some('b') => -1,
        Some(_) => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(((base + accidental).rem_euclid(SEMITONES_PER_OCTAVE as i32)) as u8)
}
