//! Result Record - one row per measured or skipped combination

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder rendered for every metric of a skipped run.
pub const SENTINEL: &str = "-";

/// Separator between method name and heuristic name in a method label.
pub const HEURISTIC_SEPARATOR: &str = "_";

/// Identity of one measurable (problem, method, heuristic) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentKey {
    problem: String,
    method: String,
    heuristic: Option<String>,
}

impl ExperimentKey {
    /// Create a key. An empty heuristic name means "no heuristic".
    #[must_use]
    pub fn new(
        problem: impl Into<String>,
        method: impl Into<String>,
        heuristic: Option<&str>,
    ) -> Self {
        Self {
            problem: problem.into(),
            method: method.into(),
            heuristic: heuristic.filter(|h| !h.is_empty()).map(str::to_string),
        }
    }

    /// Get the problem name.
    #[must_use]
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Get the bare method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the heuristic name, if any.
    #[must_use]
    pub fn heuristic(&self) -> Option<&str> {
        self.heuristic.as_deref()
    }

    /// The stored `Search Method` label: `method` or `method_heuristic`.
    #[must_use]
    pub fn label(&self) -> String {
        method_label(&self.method, self.heuristic.as_deref())
    }
}

/// Build a method label from a method name and optional heuristic.
#[must_use]
pub fn method_label(method: &str, heuristic: Option<&str>) -> String {
    match heuristic {
        Some(h) if !h.is_empty() => format!("{method}{HEURISTIC_SEPARATOR}{h}"),
        _ => method.to_string(),
    }
}

/// Metrics of one executed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Node expansions (`succs` counter).
    pub expansions: u64,
    /// Goal tests performed.
    pub goal_tests: u64,
    /// Child states generated (`states` counter).
    pub new_nodes: u64,
    /// Number of actions in the solution.
    pub plan_length: u64,
    /// Monotonic wall time of the search call, in seconds.
    pub elapsed_seconds: f64,
    /// Rendered actions in solution order.
    pub actions: Vec<String>,
}

/// What a row holds: real metrics, or the sentinel for every metric.
///
/// There is no partially-skipped state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Measurement {
    /// The search ran to a solution.
    Measured(Metrics),
    /// The combination was excluded and never executed.
    Skipped,
}

impl Measurement {
    /// Whether this is the sentinel placeholder.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Get the metrics, if measured.
    #[must_use]
    pub const fn metrics(&self) -> Option<&Metrics> {
        match self {
            Self::Measured(metrics) => Some(metrics),
            Self::Skipped => None,
        }
    }

    /// Elapsed seconds, if measured.
    #[must_use]
    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.metrics().map(|m| m.elapsed_seconds)
    }
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    problem: String,
    search_method: String,
    measurement: Measurement,
    recorded_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(
        problem: impl Into<String>,
        search_method: impl Into<String>,
        measurement: Measurement,
    ) -> Self {
        Self {
            problem: problem.into(),
            search_method: search_method.into(),
            measurement,
            recorded_at: Utc::now(),
        }
    }

    /// Create a record for an experiment key.
    #[must_use]
    pub fn for_key(key: &ExperimentKey, measurement: Measurement) -> Self {
        Self::new(key.problem(), key.label(), measurement)
    }

    /// Set a custom timestamp (used when decoding stored rows).
    #[must_use]
    pub const fn with_recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    /// Get the problem name.
    #[must_use]
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Get the method label.
    #[must_use]
    pub fn search_method(&self) -> &str {
        &self.search_method
    }

    /// Get the measurement.
    #[must_use]
    pub const fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Get the time the record was produced.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Whether this row matches a (problem, method label) pair exactly.
    #[must_use]
    pub fn matches(&self, problem: &str, search_method: &str) -> bool {
        self.problem == problem && self.search_method == search_method
    }
}

/// Tab-separated row in column order, with [`SENTINEL`] for skipped metrics.
impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.problem, self.search_method)?;
        match &self.measurement {
            Measurement::Measured(m) => write!(
                f,
                "\t{}\t{}\t{}\t{}\t{:.6}\t[{}]",
                m.expansions,
                m.goal_tests,
                m.new_nodes,
                m.plan_length,
                m.elapsed_seconds,
                m.actions.join(", ")
            ),
            Measurement::Skipped => {
                for _ in 0..6 {
                    write!(f, "\t{SENTINEL}")?;
                }
                Ok(())
            }
        }
    }
}
