//! Experiment Matrix - the fixed (problem x method) cross product

use crate::problem::{InstrumentedProblem, Node, Problem};

use super::record::{method_label, ExperimentKey};

/// Creates a fresh problem instance for each run.
pub type ProblemFactory<P> = Box<dyn Fn() -> P>;

/// Uninformed search: `search(problem) -> Option<Node>`.
pub type SearchFn<P> =
    Box<dyn Fn(&InstrumentedProblem<P>) -> Option<Node<<P as Problem>::State>>>;

/// Informed search: `search(problem, heuristic) -> Option<Node>`.
pub type InformedSearchFn<P> = Box<
    dyn Fn(
        &InstrumentedProblem<P>,
        &dyn Fn(&Node<<P as Problem>::State>) -> f64,
    ) -> Option<Node<<P as Problem>::State>>,
>;

/// A named problem factory.
pub struct ProblemEntry<P> {
    name: String,
    factory: ProblemFactory<P>,
}

impl<P: Problem> ProblemEntry<P> {
    /// Create a problem entry.
    #[must_use]
    pub fn new(name: impl Into<String>, factory: impl Fn() -> P + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Box::new(factory),
        }
    }

    /// Get the problem name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instantiate the problem.
    #[must_use]
    pub fn instantiate(&self) -> P {
        (self.factory)()
    }
}

/// How a method is invoked.
pub enum Search<P: Problem> {
    /// No heuristic.
    Uninformed(SearchFn<P>),
    /// Heuristic resolved by name on each freshly instantiated problem.
    Informed {
        /// The search function.
        search: InformedSearchFn<P>,
        /// Heuristic name passed to [`Problem::heuristic`].
        heuristic: String,
    },
}

/// A named search method, optionally paired with a heuristic name.
pub struct MethodEntry<P: Problem> {
    name: String,
    search: Search<P>,
}

impl<P: Problem> MethodEntry<P> {
    /// Create an uninformed method entry.
    #[must_use]
    pub fn uninformed<F>(name: impl Into<String>, search: F) -> Self
    where
        F: Fn(&InstrumentedProblem<P>) -> Option<Node<P::State>> + 'static,
    {
        Self {
            name: name.into(),
            search: Search::Uninformed(Box::new(search)),
        }
    }

    /// Create an informed method entry using the named heuristic.
    #[must_use]
    pub fn informed<F>(name: impl Into<String>, search: F, heuristic: impl Into<String>) -> Self
    where
        F: Fn(&InstrumentedProblem<P>, &dyn Fn(&Node<P::State>) -> f64) -> Option<Node<P::State>>
            + 'static,
    {
        Self {
            name: name.into(),
            search: Search::Informed {
                search: Box::new(search),
                heuristic: heuristic.into(),
            },
        }
    }

    /// Get the bare method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the heuristic name, if this method uses one.
    #[must_use]
    pub fn heuristic(&self) -> Option<&str> {
        match &self.search {
            Search::Uninformed(_) => None,
            Search::Informed { heuristic, .. } => Some(heuristic),
        }
    }

    /// The stored label: name, plus `_heuristic` when one is set.
    #[must_use]
    pub fn label(&self) -> String {
        method_label(&self.name, self.heuristic())
    }

    /// Get the invocation.
    #[must_use]
    pub const fn search(&self) -> &Search<P> {
        &self.search
    }
}

/// Ordered problems crossed with ordered methods.
///
/// Immutable once built; indices are declaration order.
pub struct ExperimentMatrix<P: Problem> {
    problems: Vec<ProblemEntry<P>>,
    methods: Vec<MethodEntry<P>>,
}

impl<P: Problem> ExperimentMatrix<P> {
    /// Create a matrix from problem and method lists.
    #[must_use]
    pub fn new(problems: Vec<ProblemEntry<P>>, methods: Vec<MethodEntry<P>>) -> Self {
        Self { problems, methods }
    }

    /// Get the problems in declaration order.
    #[must_use]
    pub fn problems(&self) -> &[ProblemEntry<P>] {
        &self.problems
    }

    /// Get the methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[MethodEntry<P>] {
        &self.methods
    }

    /// Number of (problem, method) cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len() * self.methods.len()
    }

    /// Whether the matrix has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The experiment key of one cell.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn key(&self, problem_idx: usize, method_idx: usize) -> ExperimentKey {
        let method = &self.methods[method_idx];
        ExperimentKey::new(
            self.problems[problem_idx].name(),
            method.name(),
            method.heuristic(),
        )
    }

    /// All cells as `(problem_idx, method_idx)` in row-major declaration order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.problems.len())
            .flat_map(move |p| (0..self.methods.len()).map(move |m| (p, m)))
    }
}
