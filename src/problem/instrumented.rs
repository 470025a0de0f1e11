//! Counting decorator around a [`Problem`]

use std::cell::Cell;

use super::{Action, Heuristic, Problem};

/// A problem wrapper that counts work done by a search.
///
/// - `succs`: calls to [`Problem::actions`] (one per node expansion)
/// - `states`: calls to [`Problem::result`] (one per child generated)
/// - `goal_tests`: calls to [`Problem::goal_test`], whatever the outcome
///
/// Every operation is forwarded unchanged, so the search visits the same
/// states in the same order as it would on the bare problem.
#[derive(Debug)]
pub struct InstrumentedProblem<P> {
    inner: P,
    succs: Cell<u64>,
    goal_tests: Cell<u64>,
    states: Cell<u64>,
}

impl<P: Problem> InstrumentedProblem<P> {
    /// Wrap a problem with all counters at zero.
    #[must_use]
    pub const fn new(inner: P) -> Self {
        Self {
            inner,
            succs: Cell::new(0),
            goal_tests: Cell::new(0),
            states: Cell::new(0),
        }
    }

    /// Number of successor expansions.
    #[must_use]
    pub fn succs(&self) -> u64 {
        self.succs.get()
    }

    /// Number of goal tests.
    #[must_use]
    pub fn goal_tests(&self) -> u64 {
        self.goal_tests.get()
    }

    /// Number of child states generated.
    #[must_use]
    pub fn states(&self) -> u64 {
        self.states.get()
    }
}

fn bump(counter: &Cell<u64>) {
    counter.set(counter.get() + 1);
}

impl<P: Problem> Problem for InstrumentedProblem<P> {
    type State = P::State;

    fn initial(&self) -> Self::State {
        self.inner.initial()
    }

    fn actions(&self, state: &Self::State) -> Vec<Action> {
        bump(&self.succs);
        self.inner.actions(state)
    }

    fn result(&self, state: &Self::State, action: &Action) -> Self::State {
        bump(&self.states);
        self.inner.result(state, action)
    }

    fn goal_test(&self, state: &Self::State) -> bool {
        bump(&self.goal_tests);
        self.inner.goal_test(state)
    }

    fn path_cost(
        &self,
        cost_so_far: f64,
        from: &Self::State,
        action: &Action,
        to: &Self::State,
    ) -> f64 {
        self.inner.path_cost(cost_so_far, from, action, to)
    }

    fn heuristic(&self, name: &str) -> Option<Heuristic<'_, Self::State>> {
        self.inner.heuristic(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Node;
    use std::rc::Rc;

    struct Fan;

    impl Problem for Fan {
        type State = u8;

        fn initial(&self) -> u8 {
            0
        }

        fn actions(&self, state: &u8) -> Vec<Action> {
            if *state == 0 {
                vec![
                    Action::new("Go", ["1"]),
                    Action::new("Go", ["2"]),
                    Action::new("Go", ["3"]),
                ]
            } else {
                Vec::new()
            }
        }

        fn result(&self, _state: &u8, action: &Action) -> u8 {
            action.args()[0].parse().unwrap()
        }

        fn goal_test(&self, state: &u8) -> bool {
            *state == 3
        }

        fn heuristic(&self, name: &str) -> Option<Heuristic<'_, u8>> {
            match name {
                "h_distance" => Some(Box::new(|node: &Node<u8>| f64::from(3 - *node.state()))),
                _ => None,
            }
        }
    }

    #[test]
    fn test_counters_start_at_zero() {
        let problem = InstrumentedProblem::new(Fan);
        assert_eq!(problem.succs(), 0);
        assert_eq!(problem.goal_tests(), 0);
        assert_eq!(problem.states(), 0);
    }

    #[test]
    fn test_expand_counts_one_succ_and_one_state_per_child() {
        let problem = InstrumentedProblem::new(Fan);
        let root = Rc::new(Node::root(problem.initial()));
        let children = root.expand(&problem);

        assert_eq!(children.len(), 3);
        assert_eq!(problem.succs(), 1);
        assert_eq!(problem.states(), 3);
        assert_eq!(problem.goal_tests(), 0);
    }

    #[test]
    fn test_goal_test_counts_regardless_of_outcome() {
        let problem = InstrumentedProblem::new(Fan);
        assert!(!problem.goal_test(&0));
        assert!(problem.goal_test(&3));
        assert_eq!(problem.goal_tests(), 2);
    }

    #[test]
    fn test_passthrough_does_not_change_results() {
        let problem = InstrumentedProblem::new(Fan);
        let action = Action::new("Go", ["2"]);
        assert_eq!(problem.result(&0, &action), Fan.result(&0, &action));
        assert_eq!(problem.actions(&0), Fan.actions(&0));
        assert!((problem.path_cost(1.0, &0, &action, &2) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heuristic_reachable_through_wrapper() {
        let problem = InstrumentedProblem::new(Fan);
        let h = problem.heuristic("h_distance").expect("heuristic forwarded");
        assert!((h(&Node::root(1)) - 2.0).abs() < f64::EPSILON);
        assert!(problem.heuristic("h_missing").is_none());
    }
}
