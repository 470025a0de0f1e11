//! Reporting view over the result store
//!
//! Read-only: builds one observation per (problem, method) pair from the
//! stored rows and renders elapsed time with problems as the categorical
//! axis and methods as the series.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use crate::experiment::ResultRecord;
use crate::storage::ResultStore;
use crate::{Error, Result};

/// Width of the longest bar in the text chart.
const BAR_WIDTH: usize = 40;

/// Floor applied before taking the log of a time, in seconds.
const MIN_SECONDS: f64 = 1e-6;

/// Elapsed time of one (problem, method) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Problem name.
    pub problem: String,
    /// Method label.
    pub search_method: String,
    /// Elapsed seconds, `None` for a skipped run.
    pub time: Option<f64>,
}

/// Time comparison across problems and methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonReport {
    problems: Vec<String>,
    methods: Vec<String>,
    observations: Vec<Observation>,
}

impl ComparisonReport {
    /// Build the report from stored rows.
    ///
    /// Problems and methods keep the order in which they first appear. If a
    /// pair occurs more than once, the first row wins.
    #[must_use]
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let mut report = Self::default();
        let mut seen = HashSet::new();

        for record in records {
            let pair = (record.problem(), record.search_method());
            if !seen.insert(pair) {
                warn!(
                    problem = record.problem(),
                    method = record.search_method(),
                    "duplicate row in result table, keeping the first"
                );
                continue;
            }
            if !report.problems.iter().any(|p| p == record.problem()) {
                report.problems.push(record.problem().to_string());
            }
            if !report.methods.iter().any(|m| m == record.search_method()) {
                report.methods.push(record.search_method().to_string());
            }
            report.observations.push(Observation {
                problem: record.problem().to_string(),
                search_method: record.search_method().to_string(),
                time: record.measurement().elapsed_seconds(),
            });
        }

        report
    }

    /// Load every row of the store's partition and build the report.
    ///
    /// # Errors
    ///
    /// Returns error if the table or partition is missing or unreadable.
    pub fn load(store: &ResultStore) -> Result<Self> {
        Ok(Self::from_records(&store.load()?))
    }

    /// Problems in first-appearance order.
    #[must_use]
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    /// Methods in first-appearance order.
    #[must_use]
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// All observations.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Time for a pair. `None` if the pair is absent or was skipped.
    #[must_use]
    pub fn time(&self, problem: &str, method: &str) -> Option<f64> {
        self.observation(problem, method).and_then(|o| o.time)
    }

    fn observation(&self, problem: &str, method: &str) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|o| o.problem == problem && o.search_method == method)
    }

    /// Render a time table and a log-scaled bar chart.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.observations.is_empty() {
            out.push_str("(no results)\n");
            return out;
        }

        let method_width = self
            .methods
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("Search Method".len());

        // Table: one row per method, one column per problem.
        let _ = write!(out, "{:<method_width$}", "Search Method");
        for problem in &self.problems {
            let _ = write!(out, "  {problem:>20}");
        }
        out.push('\n');
        for method in &self.methods {
            let _ = write!(out, "{method:<method_width$}");
            for problem in &self.problems {
                let cell = self
                    .time(problem, method)
                    .map_or_else(|| "-".to_string(), |t| format!("{t:.6}"));
                let _ = write!(out, "  {cell:>20}");
            }
            out.push('\n');
        }

        // Chart: grouped by problem, log10 seconds.
        let (lo, hi) = self.log_range();
        out.push_str("\nTime (s, log scale)\n");
        for problem in &self.problems {
            let _ = writeln!(out, "{problem}");
            for method in &self.methods {
                let Some(observation) = self.observation(problem, method) else {
                    continue;
                };
                match observation.time {
                    Some(t) => {
                        let bar = "#".repeat(bar_len(t, lo, hi));
                        let _ = writeln!(out, "  {method:<method_width$} |{bar} {t:.6}");
                    }
                    None => {
                        let _ = writeln!(out, "  {method:<method_width$} | -");
                    }
                }
            }
        }
        out
    }

    /// Render the observations as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.observations)
            .map_err(|e| Error::StorageError(format!("Failed to serialize report: {e}")))
    }

    fn log_range(&self) -> (f64, f64) {
        self.observations
            .iter()
            .filter_map(|o| o.time)
            .map(|t| t.max(MIN_SECONDS).log10())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Bar length for a time, scaled so the fastest run gets one cell and the
/// slowest gets `BAR_WIDTH`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn bar_len(seconds: f64, lo: f64, hi: f64) -> usize {
    let v = seconds.max(MIN_SECONDS).log10();
    if hi - lo <= f64::EPSILON {
        return BAR_WIDTH;
    }
    let scaled = (v - lo) / (hi - lo) * (BAR_WIDTH - 1) as f64;
    1 + scaled.round().clamp(0.0, (BAR_WIDTH - 1) as f64) as usize
}
