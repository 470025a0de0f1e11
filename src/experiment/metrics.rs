//! Metric Extractor - turns a finished run into a measurement

use std::time::Duration;

use crate::problem::{InstrumentedProblem, Node, Problem};
use crate::{Error, Result};

use super::executor::RunOutcome;
use super::record::{Measurement, Metrics};

/// Read counters, plan and timing off a finished run.
///
/// Actions are rendered as `Name(arg, ...)` in solution order.
///
/// # Errors
///
/// [`Error::InconsistentCounters`] when the counters cannot describe a
/// search that returned a solution (no goal test was ever performed).
pub fn extract<P: Problem>(
    method: &str,
    problem: &InstrumentedProblem<P>,
    node: &Node<P::State>,
    elapsed: Duration,
) -> Result<Measurement> {
    if problem.goal_tests() == 0 {
        return Err(Error::InconsistentCounters {
            method: method.to_string(),
            detail: "solution returned without any goal test".to_string(),
        });
    }

    let solution = node.solution();
    Ok(Measurement::Measured(Metrics {
        expansions: problem.succs(),
        goal_tests: problem.goal_tests(),
        new_nodes: problem.states(),
        plan_length: solution.len() as u64,
        elapsed_seconds: elapsed.as_secs_f64(),
        actions: solution.iter().map(ToString::to_string).collect(),
    }))
}

/// [`extract`] applied to a [`RunOutcome`].
///
/// # Errors
///
/// See [`extract`].
pub fn extract_outcome<P: Problem>(method: &str, outcome: &RunOutcome<P>) -> Result<Measurement> {
    extract(method, outcome.problem(), outcome.node(), outcome.elapsed())
}

/// Placeholder for an excluded run: every metric is the sentinel.
///
/// Never used for a run that was attempted and failed.
#[must_use]
pub const fn failed_record() -> Measurement {
    Measurement::Skipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air_cargo::air_cargo_p1;
    use crate::search::breadth_first_search;

    #[test]
    fn test_extract_reads_counters_and_plan() {
        let problem = InstrumentedProblem::new(air_cargo_p1());
        let node = breadth_first_search(&problem).unwrap();
        let measurement =
            extract("breadth_first_search", &problem, &node, Duration::from_millis(250)).unwrap();

        let metrics = measurement.metrics().unwrap();
        assert_eq!(metrics.expansions, problem.succs());
        assert_eq!(metrics.goal_tests, problem.goal_tests());
        assert_eq!(metrics.new_nodes, problem.states());
        assert_eq!(metrics.plan_length, 6);
        assert_eq!(metrics.actions.len(), 6);
        assert!((metrics.elapsed_seconds - 0.25).abs() < 1e-9);
        assert!(metrics.actions.iter().all(|a| a.contains('(') && a.ends_with(')')));
    }

    #[test]
    fn test_extract_rejects_zero_goal_tests() {
        let problem = InstrumentedProblem::new(air_cargo_p1());
        let node = Node::root(problem.initial());
        let err = extract("fake", &problem, &node, Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::InconsistentCounters { .. }));
    }

    #[test]
    fn test_failed_record_is_sentinel() {
        assert!(failed_record().is_skipped());
        assert!(failed_record().metrics().is_none());
    }
}
