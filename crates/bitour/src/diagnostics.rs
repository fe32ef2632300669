//! Solver diagnostics: timing and counts for each stage.
//!
//! [`solve_with_diagnostics`] runs the same stages as
//! [`solve_with_config`](crate::solve_with_config) and records how long
//! each one took alongside stage-specific counts. This is the crate's
//! only instrumentation; nothing is printed.
//!
//! Timestamps come from a caller-supplied [`Clock`] so the crate stays
//! free of platform assumptions. [`WebClock`] is backed by the
//! `web-time` crate, which uses `performance.now()` on WASM and
//! `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::reconstruct::build_path;
use crate::sort::sort_by_x;
use crate::table::{Direction, PathNode, TourTable};
use crate::types::{Tour, TourConfig, TourError, TourVertex};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by [`web_time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    type Instant = web_time::Instant;

    fn now(&self) -> web_time::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &web_time::Instant) -> Duration {
        since.elapsed()
    }
}

/// Diagnostics collected from a single solver run.
///
/// The sort, table and reconstruction stages are `None` when the input
/// was small enough to be returned unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourDiagnostics {
    /// Configuration and input checks.
    pub validate: StageDiagnostics,
    /// Sorting by x.
    pub sort: Option<StageDiagnostics>,
    /// Distance and reconstruction table fill.
    pub table: Option<StageDiagnostics>,
    /// Walking the reconstruction chain.
    pub reconstruct: Option<StageDiagnostics>,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary of the result.
    pub summary: TourSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Input checks.
    Validate {
        /// Number of input points.
        point_count: usize,
        /// Configured point limit.
        max_points: usize,
    },
    /// Sorting by x.
    Sort {
        /// Number of points sorted.
        point_count: usize,
        /// Number of distinct x values.
        distinct_x: usize,
    },
    /// Table fill.
    TableFill {
        /// Cells in each table (`n * n`).
        cells: usize,
        /// Cells actually written (`i <= j`).
        filled_cells: usize,
        /// Cells resolved by the closing-case search.
        closing_cells: usize,
        /// Approximate bytes held by both tables.
        table_bytes: usize,
    },
    /// Reconstruction walk.
    Reconstruct {
        /// Vertices written from the front.
        forward_count: usize,
        /// Vertices written from the back.
        backward_count: usize,
    },
}

/// High-level summary of a solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourSummary {
    /// Number of points in the tour.
    pub point_count: usize,
    /// Whether the input was returned unchanged without running the tables.
    pub fast_path: bool,
    /// Closed tour length.
    pub tour_length: f64,
}

impl TourDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Bitonic Tour Diagnostics\n{}", "=".repeat(60)));
        lines.push(format!(
            "Points: {}{}",
            self.summary.point_count,
            if self.summary.fast_path {
                " (returned unchanged)"
            } else {
                ""
            },
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let mut stages: Vec<(&str, &StageDiagnostics)> = vec![("Validate", &self.validate)];
        if let Some(ref s) = self.sort {
            stages.push(("Sort", s));
        }
        if let Some(ref t) = self.table {
            stages.push(("Table Fill", t));
        }
        if let Some(ref r) = self.reconstruct {
            stages.push(("Reconstruct", r));
        }

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!("Tour length: {:.6}", self.summary.tour_length));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Validate {
            point_count,
            max_points,
        } => format!("{point_count} pts (limit {max_points})"),
        StageMetrics::Sort {
            point_count,
            distinct_x,
        } => format!("{point_count} pts, {distinct_x} distinct x"),
        StageMetrics::TableFill {
            cells,
            filled_cells,
            closing_cells,
            table_bytes,
        } => {
            #[allow(clippy::cast_precision_loss)]
            let mib = *table_bytes as f64 / (1024.0 * 1024.0);
            format!("{filled_cells}/{cells} cells, {closing_cells} closing, {mib:.2} MiB")
        }
        StageMetrics::Reconstruct {
            forward_count,
            backward_count,
        } => format!("{forward_count} forward, {backward_count} backward"),
    }
}

/// Run the checked solver and collect per-stage diagnostics.
///
/// Produces the same tour as [`solve_with_config`](crate::solve_with_config).
///
/// # Errors
///
/// Returns the same errors as [`solve_with_config`](crate::solve_with_config).
pub fn solve_with_diagnostics<P, C>(
    points: &[P],
    config: &TourConfig,
    clock: &C,
) -> Result<(Tour<P>, TourDiagnostics), TourError>
where
    P: TourVertex,
    C: Clock,
{
    let total_start = clock.now();

    let start = clock.now();
    config.validate()?;
    config.check_points(points)?;
    let validate = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Validate {
            point_count: points.len(),
            max_points: config.max_points,
        },
    };

    if points.len() < crate::MIN_BITONIC_POINTS {
        let tour = crate::solve(points);
        let summary = TourSummary {
            point_count: tour.len(),
            fast_path: true,
            tour_length: tour.length(),
        };
        let diagnostics = TourDiagnostics {
            validate,
            sort: None,
            table: None,
            reconstruct: None,
            total_duration: clock.elapsed(&total_start),
            summary,
        };
        return Ok((tour, diagnostics));
    }

    let start = clock.now();
    let sorted = sort_by_x(points);
    let sort = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Sort {
            point_count: sorted.len(),
            distinct_x: distinct_x(&sorted),
        },
    };

    let start = clock.now();
    let table = TourTable::build(&sorted);
    let n = table.point_count();
    let table_diag = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::TableFill {
            cells: n * n,
            filled_cells: n * (n + 1) / 2,
            closing_cells: closing_cells(n),
            table_bytes: TourConfig::table_bytes(n),
        },
    };

    let start = clock.now();
    let ordered = build_path(&table, &sorted);
    let (forward_count, backward_count) = table
        .terminal()
        .map_or((0, 0), |terminal| chain_split(terminal, table.nodes()));
    let reconstruct = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Reconstruct {
            forward_count,
            backward_count,
        },
    };

    let tour = Tour::new(ordered, table.optimal_length().unwrap_or(0.0));
    let summary = TourSummary {
        point_count: tour.len(),
        fast_path: false,
        tour_length: tour.length(),
    };

    Ok((
        tour,
        TourDiagnostics {
            validate,
            sort: Some(sort),
            table: Some(table_diag),
            reconstruct: Some(reconstruct),
            total_duration: clock.elapsed(&total_start),
            summary,
        },
    ))
}

/// Count distinct x values in points already sorted by x.
fn distinct_x<P: TourVertex>(sorted: &[P]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted
        .windows(2)
        .filter(|pair| pair[0].x_coord().total_cmp(&pair[1].x_coord()).is_ne())
        .count()
}

/// Number of cells filled by the closing-case search for `n` points:
/// `(i, i)` and `(i, i + 1)` for every row `i >= 1`.
const fn closing_cells(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        _ => 2 * n - 3,
    }
}

/// Count forward and backward nodes on the chain ending at `terminal`.
fn chain_split(terminal: PathNode, nodes: &[PathNode]) -> (usize, usize) {
    let mut forward = 0;
    let mut backward = 0;
    let mut node = terminal;
    while !node.is_nil() {
        match node.direction() {
            Direction::Forward => forward += 1,
            Direction::Backward => backward += 1,
        }
        node = node
            .predecessor()
            .and_then(|cell| nodes.get(cell).copied())
            .unwrap_or(PathNode::NIL);
    }
    (forward, backward)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    /// Clock that advances one millisecond per reading.
    struct StepClock(std::cell::Cell<u64>);

    impl Clock for StepClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.0.get();
            self.0.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.now() - since)
        }
    }

    fn sample() -> Vec<Point> {
        vec![
            Point::new(2.0, 5.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(4.0, 4.0),
            Point::new(2.5, 5.5),
        ]
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        assert!((duration_ms(d) - 1234.0).abs() < 0.01);
    }

    #[test]
    fn closing_cell_counts() {
        assert_eq!(closing_cells(0), 0);
        assert_eq!(closing_cells(1), 0);
        assert_eq!(closing_cells(2), 1);
        assert_eq!(closing_cells(5), 7);
    }

    #[test]
    fn distinct_x_counts_ties_once() {
        let sorted = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        ];
        assert_eq!(distinct_x(&sorted), 2);
        assert_eq!(distinct_x::<Point>(&[]), 0);
    }

    #[test]
    fn diagnostics_match_plain_solve() {
        let points = sample();
        let (tour, diag) =
            solve_with_diagnostics(&points, &TourConfig::default(), &WebClock).unwrap();
        assert_eq!(tour, crate::solve(&points));
        assert!(!diag.summary.fast_path);
        assert_eq!(diag.summary.point_count, 5);
        assert!((diag.summary.tour_length - tour.length()).abs() < f64::EPSILON);
    }

    #[test]
    fn stage_metrics_are_populated() {
        let (_, diag) =
            solve_with_diagnostics(&sample(), &TourConfig::default(), &StepClock(0.into()))
                .unwrap();

        assert!(matches!(
            diag.table.as_ref().unwrap().metrics,
            StageMetrics::TableFill {
                cells: 25,
                filled_cells: 15,
                closing_cells: 7,
                ..
            }
        ));
        assert!(matches!(
            diag.reconstruct.as_ref().unwrap().metrics,
            StageMetrics::Reconstruct {
                forward_count,
                backward_count,
            } if forward_count + backward_count == 5
        ));
        assert!(diag.total_duration >= diag.validate.duration);
    }

    #[test]
    fn small_input_takes_fast_path() {
        let points = vec![Point::new(1.0, 0.0), Point::new(0.0, 0.0)];
        let (tour, diag) =
            solve_with_diagnostics(&points, &TourConfig::default(), &WebClock).unwrap();
        assert_eq!(tour.points(), points.as_slice());
        assert!(diag.summary.fast_path);
        assert!(diag.sort.is_none());
        assert!(diag.table.is_none());
        assert!(diag.reconstruct.is_none());
    }

    #[test]
    fn limit_is_enforced() {
        let config = TourConfig {
            max_points: 4,
            ..TourConfig::default()
        };
        let result = solve_with_diagnostics(&sample(), &config, &WebClock);
        assert!(matches!(
            result,
            Err(TourError::TooManyPoints { count: 5, limit: 4 })
        ));
    }

    #[test]
    fn report_mentions_each_stage() {
        let (_, diag) =
            solve_with_diagnostics(&sample(), &TourConfig::default(), &StepClock(0.into()))
                .unwrap();
        let report = diag.report();
        assert!(report.contains("Bitonic Tour Diagnostics"));
        assert!(report.contains("Sort"));
        assert!(report.contains("Table Fill"));
        assert!(report.contains("Reconstruct"));
        assert!(report.contains("Tour length"));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let (_, diag) =
            solve_with_diagnostics(&sample(), &TourConfig::default(), &StepClock(0.into()))
                .unwrap();
        let json = serde_json::to_string(&diag).unwrap();
        let back: TourDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.point_count, 5);
        assert!(
            (back.total_duration.as_secs_f64() - diag.total_duration.as_secs_f64()).abs() < 1e-9
        );
    }
}
