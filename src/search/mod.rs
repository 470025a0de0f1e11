//! Classical state-space search methods
//!
//! Uninformed methods take only a problem; informed methods also take a
//! heuristic resolved through [`Problem::heuristic`]. Every method returns
//! `None` when it finishes without reaching a goal (including a depth cutoff).

mod best_first;

pub use best_first::{
    astar_search, best_first_graph_search, greedy_best_first_graph_search, uniform_cost_search,
};

use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use crate::problem::{Node, Problem};

/// Default depth limit for [`depth_limited_search`].
pub const DEFAULT_DEPTH_LIMIT: usize = 50;

/// Breadth-first graph search; goal test on generation.
pub fn breadth_first_search<P: Problem + ?Sized>(problem: &P) -> Option<Node<P::State>> {
    let root = Node::root(problem.initial());
    if problem.goal_test(root.state()) {
        return Some(root);
    }

    let mut frontier = VecDeque::from([Rc::new(root)]);
    let mut frontier_states: HashSet<P::State> =
        frontier.iter().map(|n| n.state().clone()).collect();
    let mut explored: HashSet<P::State> = HashSet::new();

    while let Some(node) = frontier.pop_front() {
        frontier_states.remove(node.state());
        explored.insert(node.state().clone());
        for child in node.expand(problem) {
            if explored.contains(child.state()) || frontier_states.contains(child.state()) {
                continue;
            }
            if problem.goal_test(child.state()) {
                return Some(child);
            }
            frontier_states.insert(child.state().clone());
            frontier.push_back(Rc::new(child));
        }
    }
    None
}

/// Breadth-first tree search (no explored set); goal test on expansion.
pub fn breadth_first_tree_search<P: Problem + ?Sized>(problem: &P) -> Option<Node<P::State>> {
    let mut frontier = VecDeque::from([Rc::new(Node::root(problem.initial()))]);
    while let Some(node) = frontier.pop_front() {
        if problem.goal_test(node.state()) {
            return Some(unwrap_node(node));
        }
        frontier.extend(node.expand(problem).into_iter().map(Rc::new));
    }
    None
}

/// Depth-first graph search; goal test on expansion.
pub fn depth_first_graph_search<P: Problem + ?Sized>(problem: &P) -> Option<Node<P::State>> {
    let root = Node::root(problem.initial());
    let mut frontier_states: HashSet<P::State> = HashSet::from([root.state().clone()]);
    let mut frontier = vec![Rc::new(root)];
    let mut explored: HashSet<P::State> = HashSet::new();

    while let Some(node) = frontier.pop() {
        frontier_states.remove(node.state());
        if problem.goal_test(node.state()) {
            return Some(unwrap_node(node));
        }
        explored.insert(node.state().clone());
        for child in node.expand(problem) {
            if explored.contains(child.state()) || frontier_states.contains(child.state()) {
                continue;
            }
            frontier_states.insert(child.state().clone());
            frontier.push(Rc::new(child));
        }
    }
    None
}

/// Depth-limited tree search with [`DEFAULT_DEPTH_LIMIT`].
pub fn depth_limited_search<P: Problem + ?Sized>(problem: &P) -> Option<Node<P::State>> {
    depth_limited_search_with(problem, DEFAULT_DEPTH_LIMIT)
}

/// Depth-limited tree search; `None` on cutoff or exhaustion.
pub fn depth_limited_search_with<P: Problem + ?Sized>(
    problem: &P,
    limit: usize,
) -> Option<Node<P::State>> {
    recursive_dls(Rc::new(Node::root(problem.initial())), problem, limit).map(unwrap_node)
}

fn recursive_dls<P: Problem + ?Sized>(
    node: Rc<Node<P::State>>,
    problem: &P,
    limit: usize,
) -> Option<Rc<Node<P::State>>> {
    if problem.goal_test(node.state()) {
        return Some(node);
    }
    if limit == 0 {
        return None;
    }
    node.expand(problem)
        .into_iter()
        .find_map(|child| recursive_dls(Rc::new(child), problem, limit - 1))
}

/// Take a node back out of its `Rc`, cloning only if a child still holds it.
fn unwrap_node<S: Clone>(node: Rc<Node<S>>) -> Node<S> {
    Rc::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Action, InstrumentedProblem};

    /// Walk a 1-D line from 0 to `goal`; moves are +1 and -1.
    struct Line {
        goal: i32,
    }

    impl Problem for Line {
        type State = i32;

        fn initial(&self) -> i32 {
            0
        }

        fn actions(&self, state: &i32) -> Vec<Action> {
            let mut moves = vec![Action::new("Right", Vec::<String>::new())];
            if *state > -3 {
                moves.push(Action::new("Left", Vec::<String>::new()));
            }
            moves
        }

        fn result(&self, state: &i32, action: &Action) -> i32 {
            match action.name() {
                "Right" => state + 1,
                _ => state - 1,
            }
        }

        fn goal_test(&self, state: &i32) -> bool {
            *state == self.goal
        }
    }

    #[test]
    fn test_breadth_first_finds_shortest_plan() {
        let node = breadth_first_search(&Line { goal: 4 }).unwrap();
        assert_eq!(node.solution().len(), 4);
        assert_eq!(*node.state(), 4);
    }

    #[test]
    fn test_breadth_first_goal_at_root() {
        let problem = InstrumentedProblem::new(Line { goal: 0 });
        let node = breadth_first_search(&problem).unwrap();
        assert!(node.solution().is_empty());
        assert_eq!(problem.goal_tests(), 1);
        assert_eq!(problem.succs(), 0);
    }

    #[test]
    fn test_breadth_first_tree_search() {
        let node = breadth_first_tree_search(&Line { goal: 2 }).unwrap();
        assert_eq!(node.solution().len(), 2);
    }

    #[test]
    fn test_depth_first_graph_search_reaches_goal() {
        let node = depth_first_graph_search(&Line { goal: 3 }).unwrap();
        assert_eq!(*node.state(), 3);
    }

    #[test]
    fn test_depth_limited_cutoff_returns_none() {
        assert!(depth_limited_search_with(&Line { goal: 5 }, 3).is_none());
        let node = depth_limited_search_with(&Line { goal: 3 }, 3).unwrap();
        assert_eq!(node.depth(), 3);
    }
}
