// Diatonic chords and the fixed harmonic progression.
//
// Chords are built by stacking scale thirds from a degree of a key, so the
// quality of each chord falls out of the key's interval pattern. Inversion
// rotates the bottom note up an octave, keeping pitch-class content intact.

use crate::Error;
use crate::key::Key;
use crate::pitch::{Pitch, SEMITONES_PER_OCTAVE};
use serde::{Deserialize, Serialize};

/// A simultaneous set of pitches, ordered bottom-up as constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub pitches: Vec<Pitch>,
}

impl Chord {
    /// Check whether any chord member has the given pitch class.
    pub fn contains_class(&self, pitch_class: u8) -> bool {
        let pc = pitch_class % SEMITONES_PER_OCTAVE;
        self.pitches.iter().any(|p| p.pitch_class() == pc)
    }

    /// The distinct pitch classes in this chord, in member order.
    pub fn pitch_classes(&self) -> Vec<u8> {
        let mut classes = Vec::with_capacity(self.pitches.len());
        for p in &self.pitches {
            let pc = p.pitch_class();
            if !classes.contains(&pc) {
                classes.push(pc);
            }
        }
        classes
    }
}

/// Build a chord from scale positions relative to a degree of a key.
///
/// `positions` are scale-degree offsets from `degree` (so `[0, 2, 4]`
/// stacks thirds into a triad). Each inversion step moves the current
/// bottom note up an octave and to the back of the list.
pub fn chord_at(
    key: Key,
    degree: usize,
    octave: i32,
    positions: &[usize],
    inversion: usize,
) -> Result<Chord, Error> {
    let mut pitches = positions
        .iter()
        .map(|&position| key.degree_pitch(degree + position, octave))
        .collect::<Result<Vec<_>, _>>()?;
    for _ in 0..inversion {
        let bottom = pitches.remove(0).shift(SEMITONES_PER_OCTAVE as i32)?;
        pitches.push(bottom);
    }
    Ok(Chord { pitches })
}

/// A diatonic triad on the given scale degree.
pub fn triad(key: Key, degree: usize, octave: i32, inversion: usize) -> Result<Chord, Error> {
    chord_at(key, degree, octave, &[0, 2, 4], inversion)
}

/// A diatonic seventh chord on the given scale degree.
pub fn seventh(key: Key, degree: usize, octave: i32, inversion: usize) -> Result<Chord, Error> {
    chord_at(key, degree, octave, &[0, 2, 4, 6], inversion)
}

/// Octave at which progression chords are voiced, below a mid-range melody.
const PROGRESSION_OCTAVE: i32 = 3;

/// The fixed harmonic progression used as generation context: triads on
/// degrees I, V, VI, and IV, with the V and IV chords in second inversion
/// and the VI chord in first inversion.
pub fn progression_for(key: Key) -> Result<Vec<Chord>, Error> {
    Ok(vec![
        triad(key, 0, PROGRESSION_OCTAVE, 0)?,
        triad(key, 4, PROGRESSION_OCTAVE, 2)?,
        triad(key, 5, PROGRESSION_OCTAVE, 1)?,
        triad(key, 3, PROGRESSION_OCTAVE, 2)?,
    ])
}
