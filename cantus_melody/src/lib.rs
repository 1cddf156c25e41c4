// Cantus melody generator.
//
// Generates short monophonic melodies by greedy sequence extension: pick a
// key, seed one note, then repeatedly score every in-key candidate for the
// next position and append the best one, breaking ties at random. The
// scoring heuristics favor staying in key, landing on progression chord
// tones, consonant steps from the previous note, and pitches the melody
// has already visited.
//
// Architecture:
// - score.rs: the fitness scorer: tunable reward weights (`ScoreParams`),
//   octave projection, per-note and whole-melody scoring
// - builder.rs: the greedy builder: key/seed selection, the
//   score-all-candidates loop, uniform tie-breaking
// - arrange.rs: timed note events, melody/chord-accompaniment rendering,
//   horizontal and vertical sequence combinators
// - midi.rs: Standard MIDI File output via `midly`
// - main.rs: the `generate` CLI binary
//
// The generator is deterministic given a seed: all randomness flows
// through an injected `rand::Rng`, so the same seed, key, and
// configuration reproduce the same melody.

pub mod arrange;
pub mod builder;
pub mod midi;
pub mod score;

pub use builder::{BuildConfig, Melody, build, build_in_key};
pub use score::{ScoreParams, octave_projections, score_melody, score_note};

/// Errors from melody generation and output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Data-model failure (bad key name, out-of-range chord voicing).
    #[error(transparent)]
    Theory(#[from] cantus_theory::Error),
    /// The candidate generator produced no candidates for a step. This
    /// indicates a broken key model upstream and is never silently skipped.
    #[error("no candidate pitches available in key {key}")]
    EmptyCandidateSet { key: cantus_theory::Key },
    /// Configuration rejected before any random choice was made.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A parameter file that is not valid JSON for `ScoreParams`.
    #[error("malformed score parameter file: {0}")]
    Params(#[from] serde_json::Error),
    /// File output failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
