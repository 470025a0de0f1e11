//! Experiment harness
//!
//! Benchmarks search methods against planning problems, one measurement per
//! (problem, method, heuristic) combination, persisted incrementally so that
//! re-running never re-measures.
//!
//! ## Data Flow
//!
//! ```text
//! ExperimentDriver ──> ExclusionSet / ResultStore::already_has
//!        │
//!        ├──> execute (InstrumentedProblem + timing)
//!        ├──> extract ──> Measurement
//!        └──> ResultStore::append
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use plan_bench::air_cargo::air_cargo_p1;
//! use plan_bench::experiment::{
//!     ExclusionSet, ExperimentDriver, ExperimentMatrix, MethodEntry, ProblemEntry,
//! };
//! use plan_bench::search::{astar_search, breadth_first_search};
//! use plan_bench::storage::ResultStore;
//!
//! let matrix = ExperimentMatrix::new(
//!     vec![ProblemEntry::new("Air Cargo Problem 1", air_cargo_p1)],
//!     vec![
//!         MethodEntry::uninformed("breadth_first_search", breadth_first_search),
//!         MethodEntry::informed("astar_search", astar_search, "h_ignore_preconditions"),
//!     ],
//! );
//! let store = ResultStore::new("data/search_report.parquet", "test");
//! let summary = ExperimentDriver::new(matrix, ExclusionSet::none(), store).run()?;
//! println!("executed {} runs", summary.executed);
//! # Ok::<(), plan_bench::Error>(())
//! ```

mod driver;
mod exclusion;
mod executor;
mod matrix;
mod metrics;
mod record;

pub use driver::{ExperimentDriver, PassSummary};
pub use exclusion::ExclusionSet;
pub use executor::{execute, RunOutcome};
pub use matrix::{
    ExperimentMatrix, InformedSearchFn, MethodEntry, ProblemEntry, ProblemFactory, Search,
    SearchFn,
};
pub use metrics::{extract, extract_outcome, failed_record};
pub use record::{
    method_label, ExperimentKey, Measurement, Metrics, ResultRecord, HEURISTIC_SEPARATOR, SENTINEL,
};
