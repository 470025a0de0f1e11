//! # plan-bench: Search Benchmarks on Planning Problems
//!
//! **Version**: 0.1.0
//!
//! Runs every (problem, search method, heuristic) combination of an
//! experiment matrix at most once, records node expansions, goal tests,
//! generated states, plan length and wall time, and appends each result to
//! a Parquet table. Re-running skips whatever is already stored.
//!
//! ## Design Principles
//!
//! - **Idempotent**: the result table is the only resumption state
//! - **Sequential**: runs never share the CPU with each other
//! - **Explicit**: matrix, exclusions and heuristics are plain data handed
//!   to the driver
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use plan_bench::config::HarnessConfig;
//! use plan_bench::report::ComparisonReport;
//! use plan_bench::suite::Suite;
//!
//! let config = HarnessConfig::builder()
//!     .output("data/search_report.parquet")
//!     .suite(Suite::Uninformed)
//!     .build()?;
//! let driver = config.driver();
//! let summary = driver.run()?;
//! println!("executed {} runs", summary.executed);
//!
//! let report = ComparisonReport::load(driver.store())?;
//! print!("{}", report.render_text());
//! # Ok::<(), plan_bench::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod air_cargo;
pub mod config;
pub mod error;
pub mod experiment;
pub mod problem;
pub mod report;
pub mod search;
pub mod storage;
pub mod suite;

pub use error::{Error, Result};
