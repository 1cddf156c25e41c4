// Fitness scoring for candidate notes.
//
// `score_note` assigns a scalar desirability to appending a candidate
// pitch to a melody, given the key and the harmonic progression. The score
// is a sum of independent terms; the weights are tunable `ScoreParams`,
// loadable from JSON the same way the generator loads other tunables.
//
// Interval terms are octave-insensitive: a perfect fifth above the
// previous note matches in every octave of the playable range. All octave
// handling goes through `octave_projections`, so no term carries its own
// range filtering. A shift that would leave the playable range simply
// means that term is not satisfied.

use cantus_theory::{Chord, Key, Pitch};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reward weights for the scoring terms. All tunable.
///
/// Key membership is symmetric (out-of-key candidates are penalized by the
/// same magnitude), chord membership is reward-only: harmonic absence is
/// neutral, key violation is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    /// Reward for being in the key; equal penalty for being outside it.
    pub key_reward: f64,
    /// Reward when the candidate's pitch class appears in any
    /// progression chord.
    pub chord_reward: f64,
    /// Reward for a unison or perfect fourth above the previous note.
    pub consonant_reward: f64,
    /// Reward for a perfect fifth above the previous note.
    pub super_consonant_reward: f64,
    /// Reward for a minor second above the previous note. Negative by
    /// default: a real penalty.
    pub dissonant_reward: f64,
    /// Per-occurrence bias toward pitches already in the melody.
    pub centricity_factor: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        ScoreParams {
            key_reward: 8.0,
            chord_reward: 3.0,
            consonant_reward: 2.0,
            super_consonant_reward: 4.0,
            dissonant_reward: -6.0,
            centricity_factor: 0.5,
        }
    }
}

impl ScoreParams {
    /// Load parameters from a JSON file. Missing fields fall back to the
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        let text = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&text)?;
        Ok(params)
    }
}

/// Every playable pitch sharing the argument's pitch class, ascending.
///
/// This is the single octave-projection primitive used by all
/// interval-based scoring terms.
pub fn octave_projections(pitch: Pitch) -> Vec<Pitch> {
    let class = pitch.pitch_class();
    (Pitch::LOWEST_MIDI..=Pitch::HIGHEST_MIDI)
        .filter(|&midi| midi % 12 == class)
        .filter_map(|midi| Pitch::new(midi as i32).ok())
        .collect()
}

/// Score a candidate pitch as the next note after `history`.
///
/// `history` is the melody so far and must be non-empty; the terms that
/// look at the previous note read its last element.
pub fn score_note(
    key: Key,
    progression: &[Chord],
    history: &[Pitch],
    candidate: Pitch,
    params: &ScoreParams,
) -> f64 {
    let mut total = 0.0;

    // Key membership, symmetric.
    if key.contains(candidate) {
        total += params.key_reward;
    } else {
        total -= params.key_reward;
    }

    // Chord membership, reward-only.
    let class = candidate.pitch_class();
    if progression.iter().any(|chord| chord.contains_class(class)) {
        total += params.chord_reward;
    }

    // Interval terms against the most recent note, each independent.
    if let Some(&last) = history.last() {
        total += interval_term(last, 0, candidate, params.consonant_reward);
        total += interval_term(last, 5, candidate, params.consonant_reward);
        total += interval_term(last, 7, candidate, params.super_consonant_reward);
        total += interval_term(last, 1, candidate, params.dissonant_reward);
    }

    // Centricity: recurrence bias toward already-used pitches.
    let recurrences = history.iter().filter(|&&p| p == candidate).count();
    total += recurrences as f64 * params.centricity_factor;

    total
}

/// One octave-insensitive interval term: the reward applies when the
/// candidate matches `last` shifted by `semitones`, in any octave. A shift
/// that leaves the playable range is not an error here; the term just
/// contributes nothing.
fn interval_term(last: Pitch, semitones: i32, candidate: Pitch, reward: f64) -> f64 {
    match last.shift(semitones) {
        Ok(target) if octave_projections(target).contains(&candidate) => reward,
        _ => 0.0,
    }
}

/// Score a complete melody: the sum of `score_note` at every position from
/// the second onward, each scored against the prefix before it. Melodies
/// shorter than two notes score 0.
pub fn score_melody(
    key: Key,
    progression: &[Chord],
    pitches: &[Pitch],
    params: &ScoreParams,
) -> f64 {
    (1..pitches.len())
        .map(|i| score_note(key, progression, &pitches[..i], pitches[i], params))
        .sum()
}
