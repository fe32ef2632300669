//! bitour-bench: CLI tool for timing bitonic tour construction.
//!
//! Runs the solver on a point set loaded from a JSON file or generated
//! at random, printing per-stage diagnostics. Useful for:
//!
//! - Measuring how table fill time and memory grow with point count
//! - Checking tours for hand-made inputs
//! - Comparing runs across seeds
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin bitour-bench -- [OPTIONS] [POINTS_JSON]
//! cargo run --release --bin bitour-bench -- --random 500 --seed 7
//! ```
//!
//! `POINTS_JSON` holds an array of `{"x": .., "y": ..}` objects.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use bitour::diagnostics::StageMetrics;
use bitour::{Point, TourConfig, TourDiagnostics, WebClock};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bitonic tour timing and diagnostics.
///
/// Computes the minimum bitonic tour for a point set and prints
/// per-stage timing and count diagnostics.
#[derive(Parser)]
#[command(name = "bitour-bench", version)]
struct Cli {
    /// Path to a JSON array of points. Required unless `--random` is given.
    points_path: Option<PathBuf>,

    /// Generate this many uniformly random points instead of reading a file.
    #[arg(long, conflicts_with = "points_path")]
    random: Option<usize>,

    /// Seed for `--random`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Side length of the square `--random` samples from.
    #[arg(long, default_value_t = 1000.0)]
    extent: f64,

    /// Largest accepted point count.
    #[arg(long, default_value_t = TourConfig::DEFAULT_MAX_POINTS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_points: usize,

    /// Reject points with NaN or infinite coordinates.
    #[arg(long)]
    reject_non_finite: bool,

    /// Full solver config as a JSON string.
    ///
    /// When provided, `--max-points` and `--reject-non-finite` are ignored.
    /// The JSON must be a valid `TourConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Print the tour (as a JSON array of points) after the first run.
    #[arg(long)]
    print_tour: bool,
}

/// Build a [`TourConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<TourConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(TourConfig {
        max_points: cli.max_points,
        reject_non_finite: cli.reject_non_finite,
    })
}

/// Load points from the file argument or generate them from `--random`.
fn points_from_cli(cli: &Cli) -> Result<Vec<Point>, String> {
    if let Some(count) = cli.random {
        if !(cli.extent.is_finite() && cli.extent > 0.0) {
            return Err(format!(
                "--extent must be positive and finite, got {}",
                cli.extent
            ));
        }
        return Ok(random_points(count, cli.seed, cli.extent));
    }

    let Some(ref path) = cli.points_path else {
        return Err("either POINTS_JSON or --random is required".to_string());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

/// `count` points drawn uniformly from `[0, extent)²`.
fn random_points(count: usize, seed: u64, extent: f64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)))
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let points = match points_from_cli(&cli) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match (&cli.points_path, cli.random) {
        (_, Some(count)) => eprintln!(
            "Points: {count} random (seed {}, extent {})",
            cli.seed, cli.extent
        ),
        (Some(path), None) => eprintln!("Points: {} from {}", points.len(), path.display()),
        (None, None) => {}
    }
    eprintln!(
        "Table memory: {} bytes",
        TourConfig::table_bytes(points.len())
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match bitour::solve_with_diagnostics(&points, &config, &WebClock) {
            Ok((tour, diagnostics)) => {
                if cli.json {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", diagnostics.report());
                }

                // Print the tour on the first run only.
                if run == 0 && cli.print_tour {
                    match serde_json::to_string_pretty(tour.points()) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing tour: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                }

                all_diagnostics.push(diagnostics);
            }
            Err(e) => {
                eprintln!("Solver error: {e}");
                return ExitCode::FAILURE;
            }
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Minimum, mean and maximum of a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spread {
    min: f64,
    mean: f64,
    max: f64,
}

impl Spread {
    /// `None` for an empty sample set.
    #[allow(clippy::cast_precision_loss)]
    fn of(samples: &[f64]) -> Option<Self> {
        let min = samples.iter().copied().reduce(f64::min)?;
        let max = samples.iter().copied().reduce(f64::max)?;
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        Some(Self { min, mean, max })
    }
}

/// Whether every run reported the bit-identical tour length.
///
/// The solver is deterministic, so a mismatch means the input or the
/// config changed between runs.
fn lengths_agree(all_diagnostics: &[TourDiagnostics]) -> bool {
    all_diagnostics
        .windows(2)
        .all(|w| w[0].summary.tour_length.to_bits() == w[1].summary.tour_length.to_bits())
}

/// Table-fill time per written cell, in nanoseconds, for each run that
/// filled a table.
#[allow(clippy::cast_precision_loss)]
fn fill_ns_per_cell(all_diagnostics: &[TourDiagnostics]) -> Vec<f64> {
    all_diagnostics
        .iter()
        .filter_map(|d| {
            let table = d.table.as_ref()?;
            let StageMetrics::TableFill { filled_cells, .. } = table.metrics else {
                return None;
            };
            (filled_cells > 0).then(|| table.duration.as_secs_f64() * 1e9 / filled_cells as f64)
        })
        .collect()
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&TourDiagnostics) -> Option<std::time::Duration>;

/// Print aggregated statistics across multiple runs.
fn print_multi_run_summary(all_diagnostics: &[TourDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    let Some(first) = all_diagnostics.first() else {
        println!("Warning: no diagnostics to summarize");
        return;
    };

    println!("Points: {}", first.summary.point_count);
    if lengths_agree(all_diagnostics) {
        println!(
            "Tour length: {:.6} (identical in every run)",
            first.summary.tour_length
        );
    } else {
        let lengths: Vec<f64> = all_diagnostics
            .iter()
            .map(|d| d.summary.tour_length)
            .collect();
        if let Some(s) = Spread::of(&lengths) {
            println!(
                "Warning: tour length differs between runs: min={:.6}  max={:.6}",
                s.min, s.max
            );
        }
    }
    if let Some(table) = &first.table
        && let StageMetrics::TableFill { table_bytes, .. } = table.metrics
    {
        println!("Table memory: {table_bytes} bytes");
    }

    println!();
    println!(
        "{:<16} {:>12} {:>12} {:>12}",
        "Stage", "Min (ms)", "Mean (ms)", "Max (ms)"
    );
    println!("{}", "-".repeat(56));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Validate", |d| Some(d.validate.duration)),
        ("Sort", |d| d.sort.as_ref().map(|s| s.duration)),
        ("Table Fill", |d| d.table.as_ref().map(|s| s.duration)),
        ("Reconstruct", |d| d.reconstruct.as_ref().map(|s| s.duration)),
        ("Total", |d| Some(d.total_duration)),
    ];

    for (name, extractor) in stage_extractors {
        let millis: Vec<f64> = all_diagnostics
            .iter()
            .filter_map(extractor)
            .map(|dur| dur.as_secs_f64() * 1000.0)
            .collect();

        if let Some(s) = Spread::of(&millis) {
            println!(
                "{name:<16} {:>10.3}ms {:>10.3}ms {:>10.3}ms",
                s.min, s.mean, s.max
            );
        }
    }

    if let Some(s) = Spread::of(&fill_ns_per_cell(all_diagnostics)) {
        println!();
        println!(
            "Table fill per cell: min={:.2}ns  mean={:.2}ns  max={:.2}ns",
            s.min, s.mean, s.max
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn random_points_are_seeded() {
        let a = random_points(16, 3, 10.0);
        let b = random_points(16, 3, 10.0);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (0.0..10.0).contains(&p.x) && (0.0..10.0).contains(&p.y)));
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::parse_from([
            "bitour-bench",
            "--random",
            "8",
            "--max-points",
            "5",
            "--config-json",
            r#"{"max_points": 64, "reject_non_finite": true}"#,
        ]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(config.max_points, 64);
        assert!(config.reject_non_finite);
    }

    #[test]
    fn flags_build_config() {
        let cli = Cli::parse_from(["bitour-bench", "--random", "8", "--max-points", "5"]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(config.max_points, 5);
        assert!(!config.reject_non_finite);
    }

    #[test]
    fn spread_of_samples() {
        assert_eq!(Spread::of(&[]), None);
        let s = Spread::of(&[3.0, 1.0, 2.0]).unwrap();
        assert!((s.min - 1.0).abs() < f64::EPSILON);
        assert!((s.mean - 2.0).abs() < f64::EPSILON);
        assert!((s.max - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn repeated_runs_report_the_same_length() {
        let points = random_points(40, 11, 100.0);
        let config = TourConfig::default();
        let runs: Vec<TourDiagnostics> = (0..3)
            .map(|_| {
                bitour::solve_with_diagnostics(&points, &config, &WebClock)
                    .unwrap()
                    .1
            })
            .collect();
        assert!(lengths_agree(&runs));
        assert_eq!(fill_ns_per_cell(&runs).len(), 3);

        let other = random_points(40, 12, 100.0);
        let (_, different) =
            bitour::solve_with_diagnostics(&other, &config, &WebClock).unwrap();
        let mut mixed = runs;
        mixed.push(different);
        assert!(!lengths_agree(&mixed));
    }

    #[test]
    fn missing_input_is_an_error() {
        let cli = Cli::parse_from(["bitour-bench"]);
        assert!(points_from_cli(&cli).is_err());
    }
}
