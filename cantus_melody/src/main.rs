// Cantus melody generator CLI entry point.
//
// Generates a greedy-scored monophonic melody and writes it to MIDI,
// optionally stacked over its chord progression as block-chord
// accompaniment.
//
// Usage:
//   cargo run -p cantus_melody --bin generate -- [output.mid] [--length N]
//     [--seed N] [--key NAME] [--tempo BPM] [--chords] [--note-beats X]
//     [--velocity V] [--params FILE]
//
// Keys: a pitch-class name plus optional minor suffix (C, F#, Am, Ebm).

use cantus_melody::arrange::{NoteSeq, melody_seq, progression_seq};
use cantus_melody::builder::{BuildConfig, build, build_in_key};
use cantus_melody::midi::write_midi;
use cantus_melody::score::{ScoreParams, score_melody};
use cantus_theory::Key;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

/// Beats each accompaniment chord is held before the progression advances.
const CHORD_BEATS: f64 = 4.0;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("melody.mid");
    let length: usize = parse_flag(&args, "--length").unwrap_or(32);
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let tempo: u16 = parse_flag(&args, "--tempo").unwrap_or(96);
    let note_beats: f64 = parse_flag(&args, "--note-beats").unwrap_or(1.0);
    let velocity: u8 = parse_flag(&args, "--velocity").unwrap_or(80);
    let include_chords = args.iter().any(|a| a == "--chords");

    let key: Option<Key> = parse_flag::<String>(&args, "--key").map(|name| {
        name.parse().unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        })
    });

    let params = match parse_flag::<String>(&args, "--params") {
        Some(path) => match ScoreParams::load(Path::new(&path)) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error loading {path}: {e}");
                std::process::exit(1);
            }
        },
        None => ScoreParams::default(),
    };

    println!("=== Cantus Melody Generator ===");
    println!("Output: {output_path}");
    println!("Length: {length} notes");
    println!("Tempo: {tempo} BPM");
    if let Some(k) = key {
        println!("Key: {k}");
    }
    if let Some(s) = seed {
        println!("Seed: {s}");
    }
    println!();

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let config = BuildConfig {
        target_length: length,
        note_beats,
        velocity,
        params,
    };

    println!("[1/3] Generating melody...");
    let result = match key {
        Some(k) => build_in_key(k, &config, &mut rng),
        None => build(&config, &mut rng),
    };
    let melody = match result {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    println!("  Key: {}", melody.key);
    println!(
        "  Notes: {}",
        melody
            .pitches
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );
    let total_score = score_melody(melody.key, &melody.progression, &melody.pitches, &config.params);
    println!("  Score: {total_score:.1}");

    println!("[2/3] Arranging...");
    let melody_part = melody_seq(&melody.pitches, config.note_beats, config.velocity);
    let total_beats = melody_part.total_beats;
    let mut parts = vec![("melody", melody_part)];
    if include_chords {
        let chord_velocity = config.velocity.saturating_sub(20);
        let chord_part =
            progression_seq(&melody.progression, CHORD_BEATS, chord_velocity, total_beats);
        println!("  Accompaniment: {} chord events.", chord_part.events.len());
        parts.push(("chords", chord_part));
    }
    let event_count: usize = parts.iter().map(|(_, seq)| seq.events.len()).sum();
    println!("  {event_count} events over {total_beats:.1} beats.");

    println!("[3/3] Writing MIDI to {output_path}...");
    let named: Vec<(&str, &NoteSeq)> = parts.iter().map(|(name, seq)| (*name, seq)).collect();
    match write_midi(&named, tempo, Path::new(output_path)) {
        Ok(()) => {
            let seconds = total_beats * 60.0 / f64::from(tempo.max(1));
            println!("  Done! Duration: {seconds:.0}s");
        }
        Err(e) => {
            eprintln!("  Error writing MIDI: {e}");
            std::process::exit(1);
        }
    }

    println!();
    println!("Play with: timidity {output_path} (or any MIDI player)");
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
