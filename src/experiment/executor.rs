//! Run Executor - one timed search over an instrumented problem

use std::time::{Duration, Instant};

use crate::problem::{InstrumentedProblem, Node, Problem};
use crate::{Error, Result};

use super::matrix::{MethodEntry, Search};

/// Everything a finished run leaves behind.
pub struct RunOutcome<P: Problem> {
    problem: InstrumentedProblem<P>,
    node: Node<P::State>,
    elapsed: Duration,
}

impl<P: Problem> RunOutcome<P> {
    /// The instrumented problem, carrying this run's counters.
    #[must_use]
    pub const fn problem(&self) -> &InstrumentedProblem<P> {
        &self.problem
    }

    /// The solution node.
    #[must_use]
    pub const fn node(&self) -> &Node<P::State> {
        &self.node
    }

    /// Time spent inside the search call.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Wrap `problem`, run the method on it and time the search call.
/// `name` identifies the problem in errors.
///
/// The heuristic, if any, is resolved on the wrapped problem before the
/// clock starts. Timing uses [`Instant`], which is monotonic.
///
/// # Errors
///
/// - [`Error::UnknownHeuristic`] if the problem lacks the named heuristic
/// - [`Error::NoSolution`] if the search returns no node
pub fn execute<P: Problem>(
    name: &str,
    problem: P,
    method: &MethodEntry<P>,
) -> Result<RunOutcome<P>> {
    let problem = InstrumentedProblem::new(problem);

    let (node, elapsed) = match method.search() {
        Search::Uninformed(search) => {
            let start = Instant::now();
            let node = search(&problem);
            (node, start.elapsed())
        }
        Search::Informed { search, heuristic } => {
            let h = problem
                .heuristic(heuristic)
                .ok_or_else(|| Error::UnknownHeuristic {
                    problem: name.to_string(),
                    method: method.label(),
                    heuristic: heuristic.clone(),
                })?;
            let start = Instant::now();
            let node = search(&problem, h.as_ref());
            (node, start.elapsed())
        }
    };

    let node = node.ok_or_else(|| Error::NoSolution {
        method: method.label(),
    })?;

    Ok(RunOutcome {
        problem,
        node,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air_cargo::{air_cargo_p1, AirCargoProblem};
    use crate::search::{breadth_first_search, greedy_best_first_graph_search};

    #[test]
    fn test_execute_uninformed() {
        let method =
            MethodEntry::<AirCargoProblem>::uninformed("breadth_first_search", breadth_first_search);
        let outcome = execute("Air Cargo Problem 1", air_cargo_p1(), &method).unwrap();
        assert_eq!(outcome.node().solution().len(), 6);
        assert!(outcome.problem().goal_tests() >= 1);
        assert!(outcome.problem().succs() > 0);
    }

    #[test]
    fn test_execute_informed_resolves_heuristic() {
        let method = MethodEntry::<AirCargoProblem>::informed(
            "greedy_best_first_graph_search",
            greedy_best_first_graph_search,
            "h_1",
        );
        let outcome = execute("Air Cargo Problem 1", air_cargo_p1(), &method).unwrap();
        assert!(!outcome.node().solution().is_empty());
    }

    #[test]
    fn test_execute_unknown_heuristic_is_fatal() {
        let method = MethodEntry::<AirCargoProblem>::informed(
            "astar_search",
            crate::search::astar_search,
            "h_nope",
        );
        let Err(err) = execute("Air Cargo Problem 1", air_cargo_p1(), &method) else {
            panic!("expected the run to fail");
        };
        assert!(matches!(
            err,
            Error::UnknownHeuristic { ref problem, ref heuristic, .. }
                if problem == "Air Cargo Problem 1" && heuristic == "h_nope"
        ));
    }

    #[test]
    fn test_execute_no_solution_is_fatal() {
        let method = MethodEntry::<AirCargoProblem>::uninformed(
            "give_up",
            |_: &InstrumentedProblem<AirCargoProblem>| None,
        );
        let Err(err) = execute("Air Cargo Problem 1", air_cargo_p1(), &method) else {
            panic!("expected the run to fail");
        };
        assert!(matches!(err, Error::NoSolution { ref method } if method == "give_up"));
    }
}
