//! Domain heuristics for [`AirCargoProblem`]

use super::{AirCargoProblem, FluentState};

/// Number of goal fluents not yet satisfied.
///
/// Every action adds at most one goal fluent, so with preconditions ignored
/// this is the exact number of actions still needed.
#[allow(clippy::cast_precision_loss)]
pub(super) fn ignore_preconditions(problem: &AirCargoProblem, state: &FluentState) -> f64 {
    problem.goal.iter().filter(|&&g| !state.holds(g)).count() as f64
}

/// Sum over goal fluents of the first level at which each appears in a
/// delete-relaxed planning graph rooted at `state`.
///
/// Mutex relations are not tracked, so levels can only underestimate the
/// full planning graph's. Returns infinity when some goal is unreachable.
#[allow(clippy::cast_precision_loss)]
pub(super) fn level_sum(problem: &AirCargoProblem, state: &FluentState) -> f64 {
    let mut reached = state.0.clone();
    let mut first_level: Vec<Option<usize>> = reached
        .iter()
        .map(|&holds| holds.then_some(0))
        .collect();

    let mut level = 0;
    loop {
        if problem.goal.iter().all(|&g| first_level[g].is_some()) {
            break;
        }
        level += 1;
        let mut next = reached.clone();
        for action in &problem.actions {
            if action.precond.iter().all(|&f| reached[f]) {
                for &f in &action.add {
                    next[f] = true;
                }
            }
        }
        if next == reached {
            return f64::INFINITY;
        }
        for (f, (&was, &now)) in reached.iter().zip(&next).enumerate() {
            if now && !was {
                first_level[f] = Some(level);
            }
        }
        reached = next;
    }

    problem
        .goal
        .iter()
        .filter_map(|&g| first_level[g])
        .sum::<usize>() as f64
}
