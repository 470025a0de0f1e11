//! Predefined experiment suites over the air cargo problems

use serde::{Deserialize, Serialize};

use crate::air_cargo::{air_cargo_p1, air_cargo_p2, air_cargo_p3, AirCargoProblem};
use crate::experiment::{ExclusionSet, ExperimentMatrix, MethodEntry, ProblemEntry};
use crate::search::{
    astar_search, breadth_first_search, breadth_first_tree_search, depth_first_graph_search,
    depth_limited_search, greedy_best_first_graph_search, uniform_cost_search,
};

/// Which matrix to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Uninformed methods plus greedy best-first with `h_1`.
    Uninformed,
    /// Everything in `Uninformed` plus A* with three heuristics.
    #[default]
    Full,
}

impl Suite {
    /// The matrix of this suite.
    #[must_use]
    pub fn matrix(self) -> ExperimentMatrix<AirCargoProblem> {
        let mut methods: Vec<MethodEntry<AirCargoProblem>> = vec![
            MethodEntry::uninformed("breadth_first_search", breadth_first_search),
            MethodEntry::uninformed("breadth_first_tree_search", breadth_first_tree_search),
            MethodEntry::uninformed("depth_first_graph_search", depth_first_graph_search),
            MethodEntry::uninformed("depth_limited_search", depth_limited_search),
            MethodEntry::uninformed("uniform_cost_search", uniform_cost_search),
            MethodEntry::informed(
                "greedy_best_first_graph_search",
                greedy_best_first_graph_search,
                "h_1",
            ),
        ];
        if self == Self::Full {
            methods.extend([
                MethodEntry::informed("astar_search", astar_search, "h_1"),
                MethodEntry::informed("astar_search", astar_search, "h_ignore_preconditions"),
                MethodEntry::informed("astar_search", astar_search, "h_pg_levelsum"),
            ]);
        }
        ExperimentMatrix::new(problems(), methods)
    }

    /// Cells of this suite that take too long to run (>10 min observed).
    #[must_use]
    pub fn exclusions(self) -> ExclusionSet {
        let uninformed = [
            (1, 1), // breadth_first_tree_search on problem 2
            (2, 1), // breadth_first_tree_search on problem 3
            (2, 3), // depth_limited_search on problem 3
        ];
        match self {
            Self::Uninformed => uninformed.into_iter().collect(),
            Self::Full => uninformed
                .into_iter()
                .chain([
                    (2, 7), // h_ignore_preconditions on problem 3
                    (1, 7), // h_ignore_preconditions on problem 2
                    (1, 8), // h_pg_levelsum on problem 2
                    (2, 8), // h_pg_levelsum on problem 3
                ])
                .collect(),
        }
    }
}

fn problems() -> Vec<ProblemEntry<AirCargoProblem>> {
    vec![
        ProblemEntry::new("Air Cargo Problem 1", air_cargo_p1),
        ProblemEntry::new("Air Cargo Problem 2", air_cargo_p2),
        ProblemEntry::new("Air Cargo Problem 3", air_cargo_p3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_shapes() {
        assert_eq!(Suite::Uninformed.matrix().len(), 18);
        assert_eq!(Suite::Full.matrix().len(), 27);
        assert_eq!(Suite::Uninformed.exclusions().len(), 3);
        assert_eq!(Suite::Full.exclusions().len(), 7);
    }

    #[test]
    fn test_exclusions_in_range() {
        for suite in [Suite::Uninformed, Suite::Full] {
            let matrix = suite.matrix();
            let excluded = matrix
                .cells()
                .filter(|&(p, m)| suite.exclusions().is_excluded(p, m))
                .count();
            assert_eq!(excluded, suite.exclusions().len());
        }
    }

    #[test]
    fn test_full_labels_are_unique() {
        let matrix = Suite::Full.matrix();
        let mut labels: Vec<String> = matrix.methods().iter().map(MethodEntry::label).collect();
        let total = labels.len();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), total);
        assert!(labels.contains(&"astar_search_h_pg_levelsum".to_string()));
    }
}
