//! Air cargo logistics planning problems
//!
//! Fluents are `At(cargo, airport)`, `In(cargo, plane)` and
//! `At(plane, airport)`. Three action schemas move cargo around:
//!
//! ```text
//! Load(c, p, a)    pre: At(c, a), At(p, a)   add: In(c, p)     del: At(c, a)
//! Unload(c, p, a)  pre: In(c, p), At(p, a)   add: At(c, a)     del: In(c, p)
//! Fly(p, from, to) pre: At(p, from)          add: At(p, to)    del: At(p, from)
//! ```
//!
//! Heuristics are exposed by name through [`Problem::heuristic`]:
//! `h_1`, `h_ignore_preconditions` and `h_pg_levelsum`.

mod heuristics;

use std::collections::HashMap;

use crate::problem::{Action, Heuristic, Node, Problem};

/// Truth assignment over the problem's fluents, indexed like
/// [`AirCargoProblem::fluents`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FluentState(Vec<bool>);

impl FluentState {
    /// Whether fluent `index` holds.
    #[must_use]
    pub fn holds(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }
}

/// A ground action schema with fluent indices.
#[derive(Debug, Clone)]
struct GroundAction {
    action: Action,
    precond: Vec<usize>,
    add: Vec<usize>,
    del: Vec<usize>,
}

impl GroundAction {
    fn applicable(&self, state: &FluentState) -> bool {
        self.precond.iter().all(|&f| state.holds(f))
    }
}

/// An air cargo planning problem instance.
#[derive(Debug, Clone)]
pub struct AirCargoProblem {
    fluents: Vec<String>,
    initial: FluentState,
    goal: Vec<usize>,
    actions: Vec<GroundAction>,
    index: HashMap<Action, usize>,
}

impl AirCargoProblem {
    /// Build a problem from object names, the true initial fluents and the goal fluents.
    ///
    /// Fluents are written as `At(C1, SFO)` / `In(C1, P1)`. Initial or goal
    /// fluents not describable with the given objects are ignored.
    #[must_use]
    pub fn new(
        cargos: &[&str],
        planes: &[&str],
        airports: &[&str],
        initial: &[&str],
        goal: &[&str],
    ) -> Self {
        let mut fluents = Vec::new();
        for &c in cargos {
            for &a in airports {
                fluents.push(format!("At({c}, {a})"));
            }
        }
        for &c in cargos {
            for &p in planes {
                fluents.push(format!("In({c}, {p})"));
            }
        }
        for &p in planes {
            for &a in airports {
                fluents.push(format!("At({p}, {a})"));
            }
        }
        let position: HashMap<&str, usize> = fluents
            .iter()
            .enumerate()
            .map(|(i, f)| (f.as_str(), i))
            .collect();
        let at = |x: &str, y: &str| position[format!("At({x}, {y})").as_str()];
        let inside = |c: &str, p: &str| position[format!("In({c}, {p})").as_str()];

        let mut actions = Vec::new();
        for &c in cargos {
            for &p in planes {
                for &a in airports {
                    actions.push(GroundAction {
                        action: Action::new("Load", [c, p, a]),
                        precond: vec![at(c, a), at(p, a)],
                        add: vec![inside(c, p)],
                        del: vec![at(c, a)],
                    });
                }
            }
        }
        for &c in cargos {
            for &p in planes {
                for &a in airports {
                    actions.push(GroundAction {
                        action: Action::new("Unload", [c, p, a]),
                        precond: vec![inside(c, p), at(p, a)],
                        add: vec![at(c, a)],
                        del: vec![inside(c, p)],
                    });
                }
            }
        }
        for &p in planes {
            for &from in airports {
                for &to in airports {
                    if to == from {
                        continue;
                    }
                    actions.push(GroundAction {
                        action: Action::new("Fly", [p, from, to]),
                        precond: vec![at(p, from)],
                        add: vec![at(p, to)],
                        del: vec![at(p, from)],
                    });
                }
            }
        }

        let lookup = |names: &[&str]| -> Vec<usize> {
            names
                .iter()
                .filter_map(|name| position.get(name).copied())
                .collect()
        };
        let mut truth = vec![false; fluents.len()];
        for i in lookup(initial) {
            truth[i] = true;
        }
        let goal = lookup(goal);
        let index = actions
            .iter()
            .enumerate()
            .map(|(i, g)| (g.action.clone(), i))
            .collect();

        Self {
            fluents,
            initial: FluentState(truth),
            goal,
            actions,
            index,
        }
    }

    /// All fluent names in state-index order.
    #[must_use]
    pub fn fluents(&self) -> &[String] {
        &self.fluents
    }

    /// Names of the fluents true in `state`.
    #[must_use]
    pub fn describe(&self, state: &FluentState) -> Vec<&str> {
        self.fluents
            .iter()
            .enumerate()
            .filter(|(i, _)| state.holds(*i))
            .map(|(_, f)| f.as_str())
            .collect()
    }

    fn ground(&self, action: &Action) -> Option<&GroundAction> {
        self.index.get(action).map(|&i| &self.actions[i])
    }
}

impl Problem for AirCargoProblem {
    type State = FluentState;

    fn initial(&self) -> FluentState {
        self.initial.clone()
    }

    fn actions(&self, state: &FluentState) -> Vec<Action> {
        self.actions
            .iter()
            .filter(|g| g.applicable(state))
            .map(|g| g.action.clone())
            .collect()
    }

    fn result(&self, state: &FluentState, action: &Action) -> FluentState {
        let mut next = state.clone();
        if let Some(ground) = self.ground(action) {
            for &f in &ground.del {
                next.0[f] = false;
            }
            for &f in &ground.add {
                next.0[f] = true;
            }
        }
        next
    }

    fn goal_test(&self, state: &FluentState) -> bool {
        self.goal.iter().all(|&f| state.holds(f))
    }

    fn heuristic(&self, name: &str) -> Option<Heuristic<'_, FluentState>> {
        match name {
            "h_1" => Some(Box::new(|_: &Node<FluentState>| 1.0)),
            "h_ignore_preconditions" => {
                Some(Box::new(move |node: &Node<FluentState>| {
                    heuristics::ignore_preconditions(self, node.state())
                }))
            }
            "h_pg_levelsum" => Some(Box::new(move |node: &Node<FluentState>| {
                heuristics::level_sum(self, node.state())
            })),
            _ => None,
        }
    }
}

/// Two planes, two cargos, two airports.
#[must_use]
pub fn air_cargo_p1() -> AirCargoProblem {
    AirCargoProblem::new(
        &["C1", "C2"],
        &["P1", "P2"],
        &["JFK", "SFO"],
        &["At(C1, SFO)", "At(C2, JFK)", "At(P1, SFO)", "At(P2, JFK)"],
        &["At(C1, JFK)", "At(C2, SFO)"],
    )
}

/// Three planes, three cargos, three airports.
#[must_use]
pub fn air_cargo_p2() -> AirCargoProblem {
    AirCargoProblem::new(
        &["C1", "C2", "C3"],
        &["P1", "P2", "P3"],
        &["JFK", "SFO", "ATL"],
        &[
            "At(C1, SFO)",
            "At(C2, JFK)",
            "At(C3, ATL)",
            "At(P1, SFO)",
            "At(P2, JFK)",
            "At(P3, ATL)",
        ],
        &["At(C1, JFK)", "At(C2, SFO)", "At(C3, SFO)"],
    )
}

/// Two planes, four cargos, four airports.
#[must_use]
pub fn air_cargo_p3() -> AirCargoProblem {
    AirCargoProblem::new(
        &["C1", "C2", "C3", "C4"],
        &["P1", "P2"],
        &["JFK", "SFO", "ATL", "ORD"],
        &[
            "At(C1, SFO)",
            "At(C2, JFK)",
            "At(C3, ATL)",
            "At(C4, ORD)",
            "At(P1, SFO)",
            "At(P2, JFK)",
        ],
        &["At(C1, JFK)", "At(C3, JFK)", "At(C2, SFO)", "At(C4, SFO)"],
    )
}
