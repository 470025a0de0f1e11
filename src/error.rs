//! Error types for plan-bench
//!
//! Only genuine failures live here. An already-measured combination and a
//! policy-excluded combination are ordinary driver outcomes, not errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// plan-bench error types
#[derive(Error, Debug)]
pub enum Error {
    /// No result table has been written yet at this path/partition
    #[error("Result table not found: {path} (partition '{partition}')")]
    TableMissing {
        /// Table file path
        path: PathBuf,
        /// Partition name within the file
        partition: String,
    },

    /// The search method finished without producing a solution
    #[error("Search failed: {method} returned no solution")]
    NoSolution {
        /// Method label (with heuristic suffix, if any)
        method: String,
    },

    /// Instrumentation counters contradict a successful search
    #[error("Inconsistent counters for {method}: {detail}")]
    InconsistentCounters {
        /// Method label (with heuristic suffix, if any)
        method: String,
        /// What was wrong
        detail: String,
    },

    /// Method entry names a heuristic the problem does not provide
    #[error("{problem} does not provide heuristic '{heuristic}' (requested by {method})")]
    UnknownHeuristic {
        /// Problem name
        problem: String,
        /// Method label
        method: String,
        /// Heuristic name that failed to resolve
        heuristic: String,
    },

    /// Storage error (Parquet/Arrow)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Stored rows that cannot be decoded into result records
    #[error("Corrupt result table: {0}")]
    CorruptTable(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl Error {
    /// True when the error only means "nothing has been stored yet".
    #[must_use]
    pub const fn is_table_missing(&self) -> bool {
        matches!(self, Self::TableMissing { .. })
    }
}
