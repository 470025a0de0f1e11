//! Best-first graph search and its specializations

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::rc::Rc;

use crate::problem::{Node, Problem};

/// Frontier entry ordered by lowest `f`, then by insertion order.
struct Entry<S> {
    f: f64,
    seq: u64,
    node: Rc<Node<S>>,
}

impl<S> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for Entry<S> {}

impl<S> PartialOrd for Entry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Entry<S> {
    // BinaryHeap is a max-heap: reverse so the smallest f (then oldest) pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Best-first graph search ordered by `f(node)`; goal test on expansion.
///
/// A frontier node is replaced when a cheaper path to its state turns up.
/// Replaced entries stay in the heap and are skipped when popped, so they
/// are never goal-tested or expanded.
pub fn best_first_graph_search<P, F>(problem: &P, f: F) -> Option<Node<P::State>>
where
    P: Problem + ?Sized,
    F: Fn(&Node<P::State>) -> f64,
{
    let root = Node::root(problem.initial());
    let mut seq = 0_u64;
    let mut best: HashMap<P::State, f64> = HashMap::new();
    let mut explored: HashSet<P::State> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    let root_f = f(&root);
    best.insert(root.state().clone(), root_f);
    frontier.push(Entry {
        f: root_f,
        seq,
        node: Rc::new(root),
    });

    while let Some(Entry { f: popped_f, node, .. }) = frontier.pop() {
        match best.get(node.state()) {
            Some(current) if *current == popped_f => {}
            _ => continue,
        }
        best.remove(node.state());

        if problem.goal_test(node.state()) {
            return Some(Rc::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone()));
        }
        explored.insert(node.state().clone());

        for child in node.expand(problem) {
            if explored.contains(child.state()) {
                continue;
            }
            let child_f = f(&child);
            let improves = best
                .get(child.state())
                .map_or(true, |existing| child_f < *existing);
            if improves {
                seq += 1;
                best.insert(child.state().clone(), child_f);
                frontier.push(Entry {
                    f: child_f,
                    seq,
                    node: Rc::new(child),
                });
            }
        }
    }
    None
}

/// Best-first search on path cost.
pub fn uniform_cost_search<P: Problem + ?Sized>(problem: &P) -> Option<Node<P::State>> {
    best_first_graph_search(problem, Node::path_cost)
}

/// Best-first search on the heuristic alone.
pub fn greedy_best_first_graph_search<P: Problem + ?Sized>(
    problem: &P,
    h: &dyn Fn(&Node<P::State>) -> f64,
) -> Option<Node<P::State>> {
    best_first_graph_search(problem, h)
}

/// A* search: best-first on `path_cost + h`.
pub fn astar_search<P: Problem + ?Sized>(
    problem: &P,
    h: &dyn Fn(&Node<P::State>) -> f64,
) -> Option<Node<P::State>> {
    best_first_graph_search(problem, |node: &Node<P::State>| node.path_cost() + h(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Action, InstrumentedProblem};

    /// Small weighted graph: A->B (1), A->C (4), B->C (1), C->D (1).
    struct Graph;

    impl Graph {
        fn cost(from: char, to: char) -> f64 {
            match (from, to) {
                ('A', 'C') => 4.0,
                _ => 1.0,
            }
        }
    }

    impl Problem for Graph {
        type State = char;

        fn initial(&self) -> char {
            'A'
        }

        fn actions(&self, state: &char) -> Vec<Action> {
            let targets: &[&str] = match state {
                'A' => &["B", "C"],
                'B' => &["C"],
                'C' => &["D"],
                _ => &[],
            };
            targets.iter().map(|t| Action::new("Go", [*t])).collect()
        }

        fn result(&self, _state: &char, action: &Action) -> char {
            action.args()[0].chars().next().unwrap()
        }

        fn goal_test(&self, state: &char) -> bool {
            *state == 'D'
        }

        fn path_cost(&self, cost: f64, from: &char, _action: &Action, to: &char) -> f64 {
            cost + Self::cost(*from, *to)
        }
    }

    #[test]
    fn test_uniform_cost_prefers_cheaper_path() {
        let node = uniform_cost_search(&Graph).unwrap();
        let plan: Vec<String> = node.solution().iter().map(ToString::to_string).collect();
        assert_eq!(plan, vec!["Go(B)", "Go(C)", "Go(D)"]);
        assert!((node.path_cost() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_astar_with_zero_heuristic_matches_ucs() {
        let zero = |_: &Node<char>| 0.0;
        let node = astar_search(&Graph, &zero).unwrap();
        assert!((node.path_cost() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_greedy_follows_heuristic() {
        // Pretend C is right next to the goal; greedy takes the direct edge.
        let h = |node: &Node<char>| match node.state() {
            'C' | 'D' => 0.0,
            _ => 10.0,
        };
        let node = greedy_best_first_graph_search(&Graph, &h).unwrap();
        assert_eq!(node.solution().len(), 2);
    }

    #[test]
    fn test_replaced_entries_are_not_goal_tested() {
        let problem = InstrumentedProblem::new(Graph);
        uniform_cost_search(&problem).unwrap();
        // A, B, C, D popped once each; the stale C (cost 4) is skipped.
        assert_eq!(problem.goal_tests(), 4);
        assert_eq!(problem.succs(), 3);
    }
}
