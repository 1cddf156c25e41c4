// Major and minor keys as interval patterns over a tonic pitch class.
//
// A key defines which of the 12 pitch classes belong to it; its member
// pitches are those classes projected across every octave of the playable
// range. Scale-degree arithmetic wraps into higher octaves, so degree 7 of
// C major is the C one octave above the tonic.

use crate::Error;
use crate::pitch::{Pitch, SEMITONES_PER_OCTAVE, parse_pitch_class, pitch_class_name};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two supported key qualities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyQuality {
    Major,
    Minor,
}

impl KeyQuality {
    /// Semitone intervals from the tonic to each scale degree.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            KeyQuality::Major => [0, 2, 4, 5, 7, 9, 11],
            KeyQuality::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }
}

/// A tonal center: a tonic pitch class plus a quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    /// Pitch class of the tonic (0 = C, 2 = D, ...).
    pub tonic: u8,
    pub quality: KeyQuality,
}

impl Key {
    pub fn new(tonic: u8, quality: KeyQuality) -> Self {
        Key {
            tonic: tonic % SEMITONES_PER_OCTAVE,
            quality,
        }
    }

    /// The full supported key set: all 12 tonics in both qualities.
    pub fn all() -> Vec<Key> {
        let mut keys = Vec::with_capacity(24);
        for tonic in 0..SEMITONES_PER_OCTAVE {
            keys.push(Key::new(tonic, KeyQuality::Major));
            keys.push(Key::new(tonic, KeyQuality::Minor));
        }
        keys
    }

    /// The 12 pitch classes that are in this key, as a boolean array
    /// indexed by absolute pitch class.
    pub fn pitch_classes(self) -> [bool; 12] {
        let mut classes = [false; 12];
        for &interval in &self.quality.intervals() {
            classes[((self.tonic + interval) % SEMITONES_PER_OCTAVE) as usize] = true;
        }
        classes
    }

    /// Check whether a pitch belongs to this key (in any octave).
    pub fn contains(self, pitch: Pitch) -> bool {
        self.pitch_classes()[pitch.pitch_class() as usize]
    }

    /// All member pitches of this key across the playable range, ascending.
    pub fn members(self) -> Vec<Pitch> {
        let classes = self.pitch_classes();
        (Pitch::LOWEST_MIDI..=Pitch::HIGHEST_MIDI)
            .filter(|&midi| classes[(midi % SEMITONES_PER_OCTAVE) as usize])
            .filter_map(|midi| Pitch::new(midi as i32).ok())
            .collect()
    }

    /// The pitch at a zero-based scale degree, anchored at the tonic of the
    /// given octave. Degrees past 6 wrap into the next octave.
    pub fn degree_pitch(self, degree: usize, octave: i32) -> Result<Pitch, Error> {
        let intervals = self.quality.intervals();
        let offset = (degree / intervals.len()) as i32 * SEMITONES_PER_OCTAVE as i32
            + intervals[degree % intervals.len()] as i32;
        let tonic = Pitch::from_class_octave(self.tonic, octave)?;
        tonic.shift(offset)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.quality {
            KeyQuality::Major => "",
            KeyQuality::Minor => "m",
        };
        write!(f, "{}{}", pitch_class_name(self.tonic), suffix)
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse a key name: "C", "F#", "Am", "Ebm".
    fn from_str(s: &str) -> Result<Self, Error> {
        let (class_name, quality) = match s.strip_suffix('m') {
            Some(rest) => (rest, KeyQuality::Minor),
            None => (s, KeyQuality::Major),
        };
        let tonic = parse_pitch_class(class_name).ok_or_else(|| Error::InvalidKey(s.to_string()))?;
        Ok(Key::new(tonic, quality))
    }
}
