// Genomic Music CLI entry point.
//
// Runs the pipeline one stage at a time (each stage reads the previous
// stage's file) or all at once. Default file names match the usual layout of
// a working directory: the FASTA export, its CDS coordinate table, the
// classified CSV, the mapped CSV and the MusicXML score.
//
// Usage:
//   genomic-music classify [FASTA] [--coords TSV] [--policy interval|reference-gap]
//     [--reference N] [--out CSV]
//   genomic-music map [CSV] [--out CSV] [--scheme circle-of-fifths|scale-degree]
//     [--voicing chord-tones|compact] [--synthetic root-note|full-chord]
//     [--introns flat|silent]
//   genomic-music score [CSV] [--out XML] [--midi MID] [--ly LY] [--tempo BPM]
//     [--title TEXT]
//   genomic-music run [FASTA] [any of the flags above] [--csv CSV] [--mapped CSV]
//
// Every subcommand accepts --config FILE (a JSON PipelineConfig); flags
// override values from the file. Logging goes to stderr; set RUST_LOG=debug
// for per-row detail.

use genomic_music::config::PipelineConfig;
use genomic_music::mapper::{IntronVoicing, SyntheticMode, map_rows};
use genomic_music::pipeline::{RunTables, ScoreOutputs, build_score, classify_files, run, write_outputs};
use genomic_music::scheme::{CircleVoicing, SchemeKind};
use genomic_music::score::Score;
use genomic_music::score_row::{load_score_rows, save_score_rows};
use genomic_music_seq::classify::PolicyKind;
use genomic_music_seq::row::{load_rows, save_rows};
use std::path::{Path, PathBuf};

const DEFAULT_FASTA: &str = "extracted_gene_sequences.fa";
const DEFAULT_COORDS: &str = "gene_and_cds_coordinates.tsv";
const DEFAULT_CLASSIFIED: &str = "extracted_sequences.csv";
const DEFAULT_MAPPED: &str = "extracted_sequences_updated.csv";
const DEFAULT_SCORE: &str = "score.musicxml";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");

    let result = match command {
        "classify" => cmd_classify(&args),
        "map" => cmd_map(&args),
        "score" => cmd_score(&args),
        "run" => cmd_run(&args),
        _ => {
            print_usage();
            std::process::exit(if command.is_empty() || command == "--help" { 0 } else { 2 });
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: genomic-music <classify|map|score|run> [INPUT] [flags]");
    eprintln!();
    eprintln!("  classify [FASTA] [--coords TSV] [--policy interval|reference-gap] [--reference N] [--out CSV]");
    eprintln!("  map [CSV] [--out CSV] [--scheme circle-of-fifths|scale-degree] [--voicing chord-tones|compact]");
    eprintln!("      [--synthetic root-note|full-chord] [--introns flat|silent]");
    eprintln!("  score [CSV] [--out XML] [--midi MID] [--ly LY] [--tempo BPM] [--title TEXT]");
    eprintln!("  run [FASTA] [flags of the stages above] [--csv CSV] [--mapped CSV]");
    eprintln!();
    eprintln!("All subcommands accept --config FILE (JSON pipeline configuration).");
}

/// First argument after the subcommand, unless it is a flag.
fn positional<'a>(args: &'a [String], default: &'a str) -> &'a str {
    args.get(2)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or(default)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

/// Parse a numeric flag, failing loudly on a missing or malformed value.
fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>, String> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let value = args
        .get(i + 1)
        .ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("invalid value '{}' for {}", value, flag))
}

/// Parse a flag value with `parse`, failing loudly on an unknown value.
fn parse_choice<T>(
    args: &[String],
    flag: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, String> {
    match parse_flag::<String>(args, flag) {
        None => Ok(None),
        Some(value) => parse(&value)
            .map(Some)
            .ok_or_else(|| format!("unknown value '{}' for {}", value, flag)),
    }
}

fn parse_policy(name: &str) -> Option<PolicyKind> {
    match name.to_lowercase().as_str() {
        "interval" => Some(PolicyKind::Interval),
        "reference-gap" => Some(PolicyKind::ReferenceGap),
        _ => None,
    }
}

fn parse_scheme(name: &str) -> Option<SchemeKind> {
    match name.to_lowercase().as_str() {
        "circle-of-fifths" => Some(SchemeKind::CircleOfFifths),
        "scale-degree" => Some(SchemeKind::ScaleDegree),
        _ => None,
    }
}

fn parse_voicing(name: &str) -> Option<CircleVoicing> {
    match name.to_lowercase().as_str() {
        "chord-tones" => Some(CircleVoicing::ChordTones),
        "compact" => Some(CircleVoicing::Compact),
        _ => None,
    }
}

fn parse_synthetic(name: &str) -> Option<SyntheticMode> {
    match name.to_lowercase().as_str() {
        "root-note" => Some(SyntheticMode::RootNote),
        "full-chord" => Some(SyntheticMode::FullChord),
        _ => None,
    }
}

fn parse_introns(name: &str) -> Option<IntronVoicing> {
    match name.to_lowercase().as_str() {
        "flat" => Some(IntronVoicing::Flat),
        "silent" => Some(IntronVoicing::Silent),
        _ => None,
    }
}

/// Load `--config` if given, then apply flag overrides for every stage.
fn load_config(args: &[String]) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match parse_flag::<PathBuf>(args, "--config") {
        Some(path) => PipelineConfig::load(&path)?,
        None => PipelineConfig::default(),
    };

    if let Some(policy) = parse_choice(args, "--policy", parse_policy)? {
        config.classifier.policy = policy;
    }
    if let Some(index) = parse_number(args, "--reference")? {
        config.classifier.reference_index = index;
    }
    if let Some(scheme) = parse_choice(args, "--scheme", parse_scheme)? {
        config.mapper.scheme = scheme;
    }
    if let Some(voicing) = parse_choice(args, "--voicing", parse_voicing)? {
        config.mapper.voicing = voicing;
    }
    if let Some(mode) = parse_choice(args, "--synthetic", parse_synthetic)? {
        config.mapper.synthetic_mode = mode;
    }
    if let Some(introns) = parse_choice(args, "--introns", parse_introns)? {
        config.mapper.intron_voicing = introns;
    }
    if let Some(tempo) = parse_number(args, "--tempo")? {
        config.score.tempo_bpm = tempo;
    }
    if let Some(title) = parse_flag(args, "--title") {
        config.score.title = title;
    }
    Ok(config)
}

/// The coordinate table, only when the interval policy will read it.
fn coordinates(args: &[String], config: &PipelineConfig) -> Option<PathBuf> {
    match config.classifier.policy {
        PolicyKind::Interval => {
            Some(parse_flag(args, "--coords").unwrap_or_else(|| PathBuf::from(DEFAULT_COORDS)))
        }
        PolicyKind::ReferenceGap => None,
    }
}

fn score_outputs(args: &[String]) -> ScoreOutputs {
    ScoreOutputs {
        musicxml: Some(parse_flag(args, "--out").unwrap_or_else(|| PathBuf::from(DEFAULT_SCORE))),
        midi: parse_flag(args, "--midi"),
        lilypond: parse_flag(args, "--ly"),
    }
}

fn cmd_classify(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let fasta = positional(args, DEFAULT_FASTA);
    let out: PathBuf = parse_flag(args, "--out").unwrap_or_else(|| PathBuf::from(DEFAULT_CLASSIFIED));
    let coords = coordinates(args, &config);

    let rows = classify_files(Path::new(fasta), coords.as_deref(), &config.classifier)?;
    save_rows(&out, &rows)?;
    println!("Classified {} -> {} ({} rows)", fasta, out.display(), rows.len());
    Ok(())
}

fn cmd_map(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let input = positional(args, DEFAULT_CLASSIFIED);
    let out: PathBuf = parse_flag(args, "--out").unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPED));

    let rows = load_rows(Path::new(input))?;
    let mapped = map_rows(&rows, &config.mapper);
    save_score_rows(&out, &mapped)?;
    println!("Mapped {} -> {} ({} rows)", input, out.display(), mapped.len());
    Ok(())
}

fn cmd_score(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let input = positional(args, DEFAULT_MAPPED);
    let outputs = score_outputs(args);

    let rows = load_score_rows(Path::new(input))?;
    let score = build_score(&rows, &config);
    write_outputs(&score, &outputs)?;
    print_summary(&score, &outputs);
    Ok(())
}

fn cmd_run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let fasta = positional(args, DEFAULT_FASTA);
    let coords = coordinates(args, &config);
    let tables = RunTables {
        classified: parse_flag(args, "--csv"),
        mapped: parse_flag(args, "--mapped"),
    };
    let outputs = score_outputs(args);

    let score = run(Path::new(fasta), coords.as_deref(), &config, &tables, &outputs)?;
    print_summary(&score, &outputs);
    Ok(())
}

fn print_summary(score: &Score, outputs: &ScoreOutputs) {
    println!("Score \"{}\": {} tracks at {} BPM", score.title, score.tracks.len(), score.tempo_bpm);
    for track in &score.tracks {
        let bars = track.total_eighths().div_ceil(genomic_music::score::BAR_EIGHTHS);
        println!("  {}: {} events, {} bars", track.label, track.events.len(), bars);
    }
    for path in [&outputs.musicxml, &outputs.midi, &outputs.lilypond]
        .into_iter()
        .flatten()
    {
        println!("  wrote {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_flags_reject_bad_values() {
        let bad_tempo = args(&["genomic-music", "score", "--tempo", "fast"]);
        assert!(load_config(&bad_tempo).is_err());
        let missing = args(&["genomic-music", "classify", "--reference"]);
        assert!(load_config(&missing).is_err());
    }

    #[test]
    fn test_numeric_flags_override_config() {
        let ok = args(&["genomic-music", "run", "--tempo", "96", "--reference", "2"]);
        let config = load_config(&ok).unwrap();
        assert_eq!(config.score.tempo_bpm, 96);
        assert_eq!(config.classifier.reference_index, 2);
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let bad = args(&["genomic-music", "map", "--scheme", "twelve-tone"]);
        assert!(load_config(&bad).is_err());
    }
}
