//! Experiment Driver - one sequential pass over the matrix

use tracing::{debug, error, info};

use crate::problem::Problem;
use crate::storage::ResultStore;
use crate::Result;

use super::exclusion::ExclusionSet;
use super::executor::execute;
use super::matrix::{ExperimentMatrix, MethodEntry, ProblemEntry};
use super::metrics::{extract_outcome, failed_record};
use super::record::{Measurement, ResultRecord};

/// Counts from one driver pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Cells executed and stored.
    pub executed: usize,
    /// Cells excluded by policy and stored as sentinel rows.
    pub excluded: usize,
    /// Cells skipped because the store already had them.
    pub already_measured: usize,
}

impl PassSummary {
    /// Rows appended during the pass.
    #[must_use]
    pub const fn appended(&self) -> usize {
        self.executed + self.excluded
    }
}

/// Runs every cell of a matrix at most once across passes.
///
/// The store is the only resumption state: after a crash, running the
/// driver again executes exactly the cells that were not yet persisted.
pub struct ExperimentDriver<P: Problem> {
    matrix: ExperimentMatrix<P>,
    exclusions: ExclusionSet,
    store: ResultStore,
}

impl<P: Problem> ExperimentDriver<P> {
    /// Create a driver over an immutable matrix and exclusion set.
    #[must_use]
    pub const fn new(
        matrix: ExperimentMatrix<P>,
        exclusions: ExclusionSet,
        store: ResultStore,
    ) -> Self {
        Self {
            matrix,
            exclusions,
            store,
        }
    }

    /// Get the store.
    #[must_use]
    pub const fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Walk the matrix in declaration order, storing one row per new cell.
    ///
    /// # Errors
    ///
    /// Any search failure or store failure ends the pass immediately. Rows
    /// appended before the failure stay persisted.
    pub fn run(&self) -> Result<PassSummary> {
        let mut summary = PassSummary::default();

        for (problem_idx, method_idx) in self.matrix.cells() {
            let problem = &self.matrix.problems()[problem_idx];
            let method = &self.matrix.methods()[method_idx];
            let key = self.matrix.key(problem_idx, method_idx);
            let label = key.label();

            if self.already_stored(key.problem(), &label)? {
                debug!(problem = key.problem(), method = %label, "already measured");
                summary.already_measured += 1;
                continue;
            }

            let measurement = if self.exclusions.is_excluded(problem_idx, method_idx) {
                info!(
                    "Skipping {} using {}{}... (excluded: expected running time exceeds budget)",
                    problem.name(),
                    method.name(),
                    with_heuristic(method)
                );
                summary.excluded += 1;
                failed_record()
            } else {
                info!(
                    "Solving {} using {}{}...",
                    problem.name(),
                    method.name(),
                    with_heuristic(method)
                );
                let measurement = measure(problem, method, &label).map_err(|e| {
                    error!(problem = problem.name(), method = %label, error = %e, "run failed");
                    e
                })?;
                summary.executed += 1;
                measurement
            };

            self.store.append_one(ResultRecord::for_key(&key, measurement))?;
        }

        info!(
            executed = summary.executed,
            excluded = summary.excluded,
            already_measured = summary.already_measured,
            "pass complete"
        );
        Ok(summary)
    }

    /// Store lookup where a missing table means nothing is stored yet.
    fn already_stored(&self, problem: &str, label: &str) -> Result<bool> {
        match self.store.already_has(problem, label) {
            Err(e) if e.is_table_missing() => Ok(false),
            other => other,
        }
    }
}

fn measure<P: Problem>(
    problem: &ProblemEntry<P>,
    method: &MethodEntry<P>,
    label: &str,
) -> Result<Measurement> {
    let outcome = execute(problem.name(), problem.instantiate(), method)?;
    extract_outcome(label, &outcome)
}

fn with_heuristic<P: Problem>(method: &MethodEntry<P>) -> String {
    method
        .heuristic()
        .map(|h| format!(" with {h}"))
        .unwrap_or_default()
}
