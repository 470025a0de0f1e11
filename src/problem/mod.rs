//! Planning problem capability
//!
//! The harness consumes problems only through the [`Problem`] trait. Search
//! methods produce [`Node`]s whose [`Node::solution`] is the ordered action
//! sequence from the initial state.
//!
//! ## Example
//!
//! ```rust
//! use plan_bench::problem::{Action, Node, Problem};
//!
//! /// Count up from 0 to 3, one step at a time.
//! struct Counter;
//!
//! impl Problem for Counter {
//!     type State = u32;
//!
//!     fn initial(&self) -> u32 {
//!         0
//!     }
//!
//!     fn actions(&self, _state: &u32) -> Vec<Action> {
//!         vec![Action::new("Inc", Vec::<String>::new())]
//!     }
//!
//!     fn result(&self, state: &u32, _action: &Action) -> u32 {
//!         state + 1
//!     }
//!
//!     fn goal_test(&self, state: &u32) -> bool {
//!         *state == 3
//!     }
//! }
//!
//! let node = plan_bench::search::breadth_first_search(&Counter).unwrap();
//! assert_eq!(node.solution().len(), 3);
//! ```

mod instrumented;

pub use instrumented::InstrumentedProblem;

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// Heuristic bound to one problem instance.
///
/// Obtained through [`Problem::heuristic`] once per run and passed
/// explicitly to informed search methods.
pub type Heuristic<'a, S> = Box<dyn Fn(&Node<S>) -> f64 + 'a>;

/// A ground action: a schema name plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    name: String,
    args: Vec<String>,
}

impl Action {
    /// Create an action from a name and its arguments.
    #[must_use]
    pub fn new<I, A>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the action name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the action arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Renders as `Name(arg1, arg2)`.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

/// A node in a search tree.
#[derive(Debug, Clone)]
pub struct Node<S> {
    state: S,
    parent: Option<Rc<Node<S>>>,
    action: Option<Action>,
    path_cost: f64,
    depth: usize,
}

impl<S: Clone> Node<S> {
    /// Create the root node for a state.
    #[must_use]
    pub const fn root(state: S) -> Self {
        Self {
            state,
            parent: None,
            action: None,
            path_cost: 0.0,
            depth: 0,
        }
    }

    /// Get the node state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Get the action that produced this node (None for the root).
    #[must_use]
    pub const fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Get the accumulated path cost.
    #[must_use]
    pub const fn path_cost(&self) -> f64 {
        self.path_cost
    }

    /// Get the depth (number of actions from the root).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Generate all children of this node.
    ///
    /// Calls [`Problem::actions`] once and [`Problem::result`] once per child.
    pub fn expand<P>(self: &Rc<Self>, problem: &P) -> Vec<Self>
    where
        P: Problem<State = S> + ?Sized,
    {
        problem
            .actions(&self.state)
            .into_iter()
            .map(|action| self.child(problem, action))
            .collect()
    }

    fn child<P>(self: &Rc<Self>, problem: &P, action: Action) -> Self
    where
        P: Problem<State = S> + ?Sized,
    {
        let state = problem.result(&self.state, &action);
        let path_cost = problem.path_cost(self.path_cost, &self.state, &action, &state);
        Self {
            state,
            parent: Some(Rc::clone(self)),
            action: Some(action),
            path_cost,
            depth: self.depth + 1,
        }
    }

    /// The sequence of actions leading from the root to this node.
    #[must_use]
    pub fn solution(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(node) = current {
            if let Some(action) = &node.action {
                actions.push(action.clone());
            }
            current = node.parent.as_deref();
        }
        actions.reverse();
        actions
    }
}

/// A planning problem: states, actions, transitions and a goal test.
pub trait Problem {
    /// Problem state. Graph searches key explored sets on it.
    type State: Clone + Eq + Hash;

    /// The initial state.
    fn initial(&self) -> Self::State;

    /// Actions applicable in `state`, in a deterministic order.
    fn actions(&self, state: &Self::State) -> Vec<Action>;

    /// The state reached by applying `action` in `state`.
    fn result(&self, state: &Self::State, action: &Action) -> Self::State;

    /// Whether `state` satisfies the goal.
    fn goal_test(&self, state: &Self::State) -> bool;

    /// Cost of a path that arrives at `to` from `from` via `action`.
    /// Defaults to unit step cost.
    fn path_cost(
        &self,
        cost_so_far: f64,
        _from: &Self::State,
        _action: &Action,
        _to: &Self::State,
    ) -> f64 {
        cost_so_far + 1.0
    }

    /// Look up a heuristic by name, bound to this problem instance.
    fn heuristic(&self, _name: &str) -> Option<Heuristic<'_, Self::State>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line {
        goal: i32,
    }

    impl Problem for Line {
        type State = i32;

        fn initial(&self) -> i32 {
            0
        }

        fn actions(&self, _state: &i32) -> Vec<Action> {
            vec![Action::new("Step", ["+1"]), Action::new("Step", ["-1"])]
        }

        fn result(&self, state: &i32, action: &Action) -> i32 {
            if action.args()[0] == "+1" {
                state + 1
            } else {
                state - 1
            }
        }

        fn goal_test(&self, state: &i32) -> bool {
            *state == self.goal
        }
    }

    #[test]
    fn test_action_display() {
        let action = Action::new("Load", ["C1", "P1", "SFO"]);
        assert_eq!(action.to_string(), "Load(C1, P1, SFO)");
        assert_eq!(Action::new("Noop", Vec::<String>::new()).to_string(), "Noop()");
    }

    #[test]
    fn test_expand_and_solution_order() {
        let problem = Line { goal: 2 };
        let root = Rc::new(Node::root(problem.initial()));
        let children = root.expand(&problem);
        assert_eq!(children.len(), 2);
        assert_eq!(*children[0].state(), 1);
        assert_eq!(children[0].depth(), 1);
        assert!((children[0].path_cost() - 1.0).abs() < f64::EPSILON);

        let first = Rc::new(children.into_iter().next().unwrap());
        let grandchild = first.expand(&problem).into_iter().next().unwrap();
        let names: Vec<String> = grandchild.solution().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["Step(+1)", "Step(+1)"]);
    }

    #[test]
    fn test_root_has_empty_solution() {
        let root = Node::root(5);
        assert!(root.solution().is_empty());
        assert!(root.action().is_none());
    }

    #[test]
    fn test_default_heuristic_is_absent() {
        assert!(Line { goal: 1 }.heuristic("h_1").is_none());
    }
}
