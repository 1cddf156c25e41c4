// Greedy melody construction.
//
// One builder run owns its key, progression, and growing pitch list; runs
// share nothing, so independent generations can proceed in parallel. All
// randomness (key choice, seed note, tie-breaking) comes from the injected
// `Rng`, making runs reproducible from a seed.
//
// The algorithm is greedy and never backtracks: each step scores every
// in-key candidate against the melody so far and appends one of the
// top scorers. A locally poor choice stays in the melody.

use crate::Error;
use crate::score::{ScoreParams, score_note};
use cantus_theory::{Chord, Key, Pitch, progression_for};
use rand::Rng;

/// Per-run generation settings.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Number of notes in the finished melody.
    pub target_length: usize,
    /// Duration of each melody note, in quarter-note beats.
    pub note_beats: f64,
    /// MIDI velocity for every note (0-127).
    pub velocity: u8,
    /// Scoring weights.
    pub params: ScoreParams,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            target_length: 32,
            note_beats: 1.0,
            velocity: 80,
            params: ScoreParams::default(),
        }
    }
}

/// A completed (or degenerate) generation run.
#[derive(Debug, Clone)]
pub struct Melody {
    pub key: Key,
    pub progression: Vec<Chord>,
    /// The melody, in order. Every pitch is a member of `key`.
    pub pitches: Vec<Pitch>,
    /// The score each appended pitch received at selection time, one entry
    /// per pitch after the seed. Their sum equals the full-melody score.
    pub step_scores: Vec<f64>,
}

impl Melody {
    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}

/// Generate a melody in a key chosen uniformly at random from the
/// supported set.
///
/// `target_length == 0` is the documented degenerate case: the key and
/// progression are still chosen, but the melody is empty and no seed note
/// is drawn.
pub fn build(config: &BuildConfig, rng: &mut impl Rng) -> Result<Melody, Error> {
    validate(config)?;
    let keys = Key::all();
    let key = keys[rng.random_range(0..keys.len())];
    build_unchecked(key, config, rng)
}

/// Generate a melody in a specific key.
pub fn build_in_key(key: Key, config: &BuildConfig, rng: &mut impl Rng) -> Result<Melody, Error> {
    validate(config)?;
    build_unchecked(key, config, rng)
}

/// Reject malformed configuration before any random choice is made, so
/// invalid input cannot consume RNG state or produce partial output.
fn validate(config: &BuildConfig) -> Result<(), Error> {
    if !config.note_beats.is_finite() || config.note_beats <= 0.0 {
        return Err(Error::Config(format!(
            "note_beats must be positive and finite, got {}",
            config.note_beats
        )));
    }
    if config.velocity > 127 {
        return Err(Error::Config(format!(
            "velocity must be a MIDI value 0-127, got {}",
            config.velocity
        )));
    }
    Ok(())
}

fn build_unchecked(key: Key, config: &BuildConfig, rng: &mut impl Rng) -> Result<Melody, Error> {
    let progression = progression_for(key)?;

    // The candidate set is fixed for the whole run: every member of the
    // key. The key invariants make this non-empty, but a broken key model
    // must fail loudly rather than generate garbage.
    let candidates = key.members();
    if candidates.is_empty() {
        return Err(Error::EmptyCandidateSet { key });
    }

    let mut pitches = Vec::with_capacity(config.target_length);
    let mut step_scores = Vec::new();

    if config.target_length == 0 {
        return Ok(Melody { key, progression, pitches, step_scores });
    }

    // Seed: one member of the key, uniformly.
    pitches.push(candidates[rng.random_range(0..candidates.len())]);

    while pitches.len() < config.target_length {
        let scores: Vec<f64> = candidates
            .iter()
            .map(|&candidate| score_note(key, &progression, &pitches, candidate, &config.params))
            .collect();
        let (winner, score) =
            pick_max(&scores, rng).ok_or(Error::EmptyCandidateSet { key })?;
        pitches.push(candidates[winner]);
        step_scores.push(score);
    }

    Ok(Melody { key, progression, pitches, step_scores })
}

/// Find the maximum score, collect every index tied for it, and draw one
/// uniformly. Indices (not pitch values) preserve candidate identity.
/// Returns `None` only for an empty score list.
fn pick_max(scores: &[f64], rng: &mut impl Rng) -> Option<(usize, f64)> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score == max)
        .map(|(index, _)| index)
        .collect();
    if tied.is_empty() {
        return None;
    }
    Some((tied[rng.random_range(0..tied.len())], max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::score_melody;
    use cantus_theory::KeyQuality;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn c_major() -> Key {
        Key::new(0, KeyQuality::Major)
    }

    #[test]
    fn test_build_reaches_target_length() {
        let config = BuildConfig { target_length: 24, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(7);
        let melody = build(&config, &mut rng).unwrap();
        assert_eq!(melody.len(), 24);
        assert_eq!(melody.step_scores.len(), 23);
        assert_eq!(melody.progression.len(), 4);
    }

    #[test]
    fn test_every_note_is_in_key() {
        let config = BuildConfig { target_length: 40, ..Default::default() };
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let melody = build(&config, &mut rng).unwrap();
            for &p in &melody.pitches {
                assert!(
                    melody.key.contains(p),
                    "pitch {p} is not in key {} (seed {seed})",
                    melody.key
                );
            }
        }
    }

    #[test]
    fn test_same_seed_same_melody() {
        let config = BuildConfig { target_length: 32, ..Default::default() };
        let a = build(&config, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = build(&config, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.key, b.key);
        assert_eq!(a.pitches, b.pitches);
        assert_eq!(a.step_scores, b.step_scores);
    }

    #[test]
    fn test_zero_length_is_empty_and_draws_nothing() {
        let config = BuildConfig { target_length: 0, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let melody = build_in_key(c_major(), &config, &mut rng).unwrap();
        assert!(melody.is_empty());
        assert!(melody.step_scores.is_empty());

        // The RNG was not touched: it still produces the same first value
        // as a fresh generator with the same seed.
        let mut fresh = StdRng::seed_from_u64(1);
        assert_eq!(rng.random::<u64>(), fresh.random::<u64>());
    }

    #[test]
    fn test_length_one_is_just_the_seed() {
        let config = BuildConfig { target_length: 1, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(5);
        let melody = build_in_key(c_major(), &config, &mut rng).unwrap();
        assert_eq!(melody.len(), 1);
        assert!(melody.step_scores.is_empty());

        // The seed is drawn uniformly from the key members with the first
        // range draw, so it is reproducible.
        let members = c_major().members();
        let mut replay = StdRng::seed_from_u64(5);
        let expected = members[replay.random_range(0..members.len())];
        assert_eq!(melody.pitches[0], expected);
    }

    #[test]
    fn test_step_scores_round_trip_through_full_scorer() {
        let config = BuildConfig { target_length: 30, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1234);
        let melody = build(&config, &mut rng).unwrap();

        let recorded: f64 = melody.step_scores.iter().sum();
        let rescored = score_melody(melody.key, &melody.progression, &melody.pitches, &config.params);
        assert_eq!(recorded, rescored, "construction-time scores must re-derive exactly");
    }

    #[test]
    fn test_invalid_config_rejected_before_randomness() {
        let mut rng = StdRng::seed_from_u64(3);

        let bad_beats = BuildConfig { note_beats: 0.0, ..Default::default() };
        assert!(matches!(build(&bad_beats, &mut rng), Err(Error::Config(_))));

        let bad_velocity = BuildConfig { velocity: 200, ..Default::default() };
        assert!(matches!(build(&bad_velocity, &mut rng), Err(Error::Config(_))));

        // Neither rejected call consumed randomness.
        let mut fresh = StdRng::seed_from_u64(3);
        assert_eq!(rng.random::<u64>(), fresh.random::<u64>());
    }

    #[test]
    fn test_pick_max_prefers_maximum_and_breaks_ties_uniformly() {
        let scores = [1.0, 5.0, 2.0, 5.0, 5.0, -3.0];
        let tied_indices = [1, 3, 4];
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = [0usize; 6];
        let trials = 6000;
        for _ in 0..trials {
            let (winner, score) = pick_max(&scores, &mut rng).unwrap();
            assert_eq!(score, 5.0);
            assert!(tied_indices.contains(&winner), "picked non-maximal index {winner}");
            counts[winner] += 1;
        }

        // Uniform among the three tied candidates: ~2000 each. Allow a
        // generous statistical margin.
        for &index in &tied_indices {
            let share = counts[index] as f64 / trials as f64;
            assert!(
                (0.25..0.42).contains(&share),
                "index {index} selected {:.1}% of the time",
                share * 100.0
            );
        }
    }

    #[test]
    fn test_pick_max_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(pick_max(&[], &mut rng).is_none());
    }

    #[test]
    fn test_all_zero_params_tie_everything() {
        // With all weights zero every candidate ties, so the melody is a
        // uniform random walk over the key members, still in key and still
        // the right length.
        let params = ScoreParams {
            key_reward: 0.0,
            chord_reward: 0.0,
            consonant_reward: 0.0,
            super_consonant_reward: 0.0,
            dissonant_reward: 0.0,
            centricity_factor: 0.0,
        };
        let config = BuildConfig { target_length: 50, params, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(8);
        let melody = build_in_key(c_major(), &config, &mut rng).unwrap();
        assert_eq!(melody.len(), 50);

        // A uniform tie-break should visit many distinct pitches.
        let mut distinct: Vec<Pitch> = melody.pitches.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert!(distinct.len() > 10, "only {} distinct pitches", distinct.len());

        assert!(melody.step_scores.iter().all(|&s| s == 0.0));
    }
}
