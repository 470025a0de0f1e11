//! Incremental result store (Arrow/Parquet)
//!
//! **Append-Only Write Pattern**:
//! - One Parquet file holds any number of named partitions, as rows tagged
//!   with a `Partition` column
//! - Appends read the whole file, add rows at the end and rewrite it
//! - Existing rows are never updated or reordered, and are copied through
//!   without being decoded
//! - Reads decode and validate only the rows of their own partition
//!
//! The rewrite goes to a sibling `.tmp` file that is renamed over the
//! target, so a crash leaves either the old or the new table on disk. No
//! fsync is issued: a power loss right after an append can still lose it.
//! The store assumes a single writer per file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float64Array, ListArray, ListBuilder, RecordBatch, StringArray,
    StringBuilder, TimestampMicrosecondArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::experiment::{Measurement, Metrics, ResultRecord};
use crate::{Error, Result};

/// Column names of the persisted table.
pub mod columns {
    /// Partition tag.
    pub const PARTITION: &str = "Partition";
    /// Problem name.
    pub const PROBLEM: &str = "Problem";
    /// Method label (with heuristic suffix).
    pub const SEARCH_METHOD: &str = "Search Method";
    /// Node expansions.
    pub const EXPANSIONS: &str = "Expansions";
    /// Goal tests.
    pub const GOAL_TESTS: &str = "Goal Tests";
    /// Generated states.
    pub const NEW_NODES: &str = "New Nodes";
    /// Plan length. The misspelling is part of the established file format.
    pub const PLAN_LENGTH: &str = "Plan Lenght";
    /// Elapsed seconds.
    pub const TIME: &str = "Time";
    /// Rendered solution actions.
    pub const ACTIONS: &str = "Actions";
    /// Time the row was produced.
    pub const RECORDED_AT: &str = "Recorded At";
}

/// Arrow schema of the persisted table.
///
/// Metric columns are nullable; null is the stored form of the sentinel.
#[must_use]
pub fn schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(columns::PARTITION, DataType::Utf8, false),
        Field::new(columns::PROBLEM, DataType::Utf8, false),
        Field::new(columns::SEARCH_METHOD, DataType::Utf8, false),
        Field::new(columns::EXPANSIONS, DataType::UInt64, true),
        Field::new(columns::GOAL_TESTS, DataType::UInt64, true),
        Field::new(columns::NEW_NODES, DataType::UInt64, true),
        Field::new(columns::PLAN_LENGTH, DataType::UInt64, true),
        Field::new(columns::TIME, DataType::Float64, true),
        Field::new(
            columns::ACTIONS,
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            true,
        ),
        Field::new(
            columns::RECORDED_AT,
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
    ]))
}

/// Persisted, append-only table of result records.
///
/// ## Example
///
/// ```rust,no_run
/// use plan_bench::experiment::{Measurement, ResultRecord};
/// use plan_bench::storage::ResultStore;
///
/// let store = ResultStore::new("data/search_report.parquet", "test");
/// let record = ResultRecord::new("Air Cargo Problem 1", "breadth_first_search", Measurement::Skipped);
///
/// match store.already_has(record.problem(), record.search_method()) {
///     Ok(true) => {}
///     Ok(false) => store.append(&[record])?,
///     Err(e) if e.is_table_missing() => store.append(&[record])?,
///     Err(e) => return Err(e.into()),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStore {
    path: PathBuf,
    partition: String,
}

impl ResultStore {
    /// Create a handle for `partition` within the file at `path`.
    ///
    /// Nothing touches the disk until the first read or append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, partition: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            partition: partition.into(),
        }
    }

    /// Get the table file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the partition name.
    #[must_use]
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Whether the table file exists at all.
    #[must_use]
    pub fn file_exists(&self) -> bool {
        self.path.is_file()
    }

    fn missing(&self) -> Error {
        Error::TableMissing {
            path: self.path.clone(),
            partition: self.partition.clone(),
        }
    }

    /// Load every record of this partition, in stored order.
    ///
    /// # Errors
    ///
    /// - [`Error::TableMissing`] if the file or the partition does not exist
    /// - [`Error::StorageError`] / [`Error::CorruptTable`] if it cannot be decoded
    pub fn load(&self) -> Result<Vec<ResultRecord>> {
        if !self.file_exists() {
            return Err(self.missing());
        }
        let mut records = Vec::new();
        for batch in read_batches(&self.path)? {
            records.extend(decode(&batch, &self.partition)?);
        }
        if records.is_empty() {
            return Err(self.missing());
        }
        Ok(records)
    }

    /// Whether a row with exactly this problem and method label exists.
    ///
    /// # Errors
    ///
    /// [`Error::TableMissing`] when nothing has been stored yet; callers
    /// treat that as "not stored". Other errors are fatal.
    pub fn already_has(&self, problem: &str, method_label: &str) -> Result<bool> {
        Ok(self
            .load()?
            .iter()
            .any(|record| record.matches(problem, method_label)))
    }

    /// Append one record.
    ///
    /// # Errors
    ///
    /// See [`append`](Self::append).
    pub fn append_one(&self, record: ResultRecord) -> Result<()> {
        self.append(&[record])
    }

    /// Append records after all existing rows and persist the table.
    ///
    /// The first write creates the file with exactly these rows; later
    /// writes read the whole file, concatenate and replace it. Duplicate
    /// keys are not rejected here: callers check [`already_has`](Self::already_has) first.
    ///
    /// # Errors
    ///
    /// Returns error if the existing table cannot be read or the new one
    /// cannot be written.
    pub fn append(&self, records: &[ResultRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut batches = if self.file_exists() {
            let existing = read_batches(&self.path)?;
            debug!(
                path = %self.path.display(),
                batches = existing.len(),
                appended = records.len(),
                "appending to result table"
            );
            existing
        } else {
            debug!(
                path = %self.path.display(),
                rows = records.len(),
                "creating result table"
            );
            Vec::new()
        };
        batches.push(encode(&self.partition, records)?);

        write_batches(&self.path, &batches)
    }
}

fn encode(partition: &str, rows: &[ResultRecord]) -> Result<RecordBatch> {
    let metric = |f: fn(&Metrics) -> u64| -> ArrayRef {
        Arc::new(
            rows.iter()
                .map(|row| row.measurement().metrics().map(f))
                .collect::<UInt64Array>(),
        )
    };

    let mut actions = ListBuilder::new(StringBuilder::new());
    for row in rows {
        match row.measurement() {
            Measurement::Measured(m) => {
                for action in &m.actions {
                    actions.values().append_value(action);
                }
                actions.append(true);
            }
            Measurement::Skipped => actions.append_null(),
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            std::iter::repeat(partition).take(rows.len()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|row| row.problem()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|row| row.search_method()),
        )),
        metric(|m| m.expansions),
        metric(|m| m.goal_tests),
        metric(|m| m.new_nodes),
        metric(|m| m.plan_length),
        Arc::new(
            rows.iter()
                .map(|row| row.measurement().elapsed_seconds())
                .collect::<Float64Array>(),
        ),
        Arc::new(actions.finish()),
        Arc::new(
            TimestampMicrosecondArray::from_iter_values(
                rows.iter()
                    .map(|row| row.recorded_at().timestamp_micros()),
            )
            .with_timezone("UTC"),
        ),
    ];

    Ok(RecordBatch::try_new(schema(), columns)?)
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| Error::CorruptTable(format!("missing column '{name}'")))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::CorruptTable(format!("column '{name}' has an unexpected type")))
}

/// Decode the rows of `partition`; rows of other partitions are not inspected.
fn decode(batch: &RecordBatch, wanted: &str) -> Result<Vec<ResultRecord>> {
    let partition = column::<StringArray>(batch, columns::PARTITION)?;
    let problem = column::<StringArray>(batch, columns::PROBLEM)?;
    let method = column::<StringArray>(batch, columns::SEARCH_METHOD)?;
    let expansions = column::<UInt64Array>(batch, columns::EXPANSIONS)?;
    let goal_tests = column::<UInt64Array>(batch, columns::GOAL_TESTS)?;
    let new_nodes = column::<UInt64Array>(batch, columns::NEW_NODES)?;
    let plan_length = column::<UInt64Array>(batch, columns::PLAN_LENGTH)?;
    let time = column::<Float64Array>(batch, columns::TIME)?;
    let actions = column::<ListArray>(batch, columns::ACTIONS)?;
    let recorded_at = column::<TimestampMicrosecondArray>(batch, columns::RECORDED_AT)?;

    let mut rows = Vec::new();
    for i in (0..batch.num_rows()).filter(|&i| partition.value(i) == wanted) {
        let nulls = [
            expansions.is_null(i),
            goal_tests.is_null(i),
            new_nodes.is_null(i),
            plan_length.is_null(i),
            time.is_null(i),
            actions.is_null(i),
        ];
        let measurement = if nulls.iter().all(|&n| n) {
            Measurement::Skipped
        } else if nulls.iter().any(|&n| n) {
            return Err(Error::CorruptTable(format!(
                "row {i} ({} / {}) mixes sentinel and measured fields",
                problem.value(i),
                method.value(i)
            )));
        } else {
            let list = actions.value(i);
            let names = list
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::CorruptTable("actions are not strings".to_string()))?;
            Measurement::Measured(Metrics {
                expansions: expansions.value(i),
                goal_tests: goal_tests.value(i),
                new_nodes: new_nodes.value(i),
                plan_length: plan_length.value(i),
                elapsed_seconds: time.value(i),
                actions: (0..names.len()).map(|j| names.value(j).to_string()).collect(),
            })
        };

        let stamp = DateTime::<Utc>::from_timestamp_micros(recorded_at.value(i))
            .ok_or_else(|| Error::CorruptTable(format!("row {i} has an invalid timestamp")))?;

        rows.push(
            ResultRecord::new(problem.value(i), method.value(i), measurement)
                .with_recorded_at(stamp),
        );
    }
    Ok(rows)
}

/// Read every batch of the file, conformed to [`schema`].
fn read_batches(path: &Path) -> Result<Vec<RecordBatch>> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let file = File::open(path)
        .map_err(|e| Error::StorageError(format!("Failed to open Parquet file: {e}")))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::StorageError(format!("Failed to parse Parquet file: {e}")))?;

    let reader = builder
        .build()
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet reader: {e}")))?;

    let mut batches = Vec::new();
    for batch in reader {
        let batch = batch
            .map_err(|e| Error::StorageError(format!("Failed to read record batch: {e}")))?;
        let batch = RecordBatch::try_new(schema(), batch.columns().to_vec())
            .map_err(|e| Error::CorruptTable(format!("unexpected table layout: {e}")))?;
        batches.push(batch);
    }
    Ok(batches)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("results"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_batches(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    use parquet::arrow::ArrowWriter;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let written = (|| -> Result<()> {
        let file = File::create(&tmp)?;
        let mut writer = ArrowWriter::try_new(file, schema(), None)
            .map_err(|e| Error::StorageError(format!("Failed to create Parquet writer: {e}")))?;
        for batch in batches {
            writer
                .write(batch)
                .map_err(|e| Error::StorageError(format!("Failed to write record batch: {e}")))?;
        }
        writer
            .close()
            .map_err(|e| Error::StorageError(format!("Failed to finalize Parquet file: {e}")))?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(problem: &str, method: &str, expansions: u64) -> ResultRecord {
        ResultRecord::new(
            problem,
            method,
            Measurement::Measured(Metrics {
                expansions,
                goal_tests: expansions + 2,
                new_nodes: expansions * 4,
                plan_length: 6,
                elapsed_seconds: 0.031,
                actions: vec!["Load(C1, P1, SFO)".to_string(), "Fly(P1, SFO, JFK)".to_string()],
            }),
        )
    }

    #[test]
    fn test_missing_file_is_table_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("none.parquet"), "test");
        let err = store.already_has("P", "M").unwrap_err();
        assert!(err.is_table_missing());
        assert!(store.load().unwrap_err().is_table_missing());
    }

    #[test]
    fn test_first_append_creates_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("nested/report.parquet"), "test");
        store.append(&[measured("P1", "bfs", 43)]).unwrap();

        assert!(store.file_exists());
        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], measured("P1", "bfs", 43).with_recorded_at(records[0].recorded_at()));
        assert!(!temp_path(store.path()).exists());
    }

    #[test]
    fn test_append_preserves_order_and_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("report.parquet"), "test");
        store.append_one(measured("P1", "bfs", 43)).unwrap();
        store
            .append(&[
                ResultRecord::new("P2", "breadth_first_tree_search", Measurement::Skipped),
                measured("P2", "bfs", 3343),
            ])
            .unwrap();

        let records = store.load().unwrap();
        let keys: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.problem(), r.search_method()))
            .collect();
        assert_eq!(
            keys,
            vec![("P1", "bfs"), ("P2", "breadth_first_tree_search"), ("P2", "bfs")]
        );
        assert!(records[1].measurement().is_skipped());
        assert_eq!(records[2].measurement().metrics().unwrap().expansions, 3343);
    }

    #[test]
    fn test_partitions_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.parquet");
        let a = ResultStore::new(&path, "a");
        let b = ResultStore::new(&path, "b");

        a.append_one(measured("P1", "bfs", 1)).unwrap();
        assert!(b.already_has("P1", "bfs").unwrap_err().is_table_missing());

        b.append_one(measured("P1", "dfs", 2)).unwrap();
        assert!(a.already_has("P1", "bfs").unwrap());
        assert!(!a.already_has("P1", "dfs").unwrap());
        assert!(b.already_has("P1", "dfs").unwrap());
        assert_eq!(a.load().unwrap().len(), 1);
    }

    #[test]
    fn test_timestamps_survive_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("report.parquet"), "test");
        let record = measured("P1", "bfs", 1);
        let micros = record.recorded_at().timestamp_micros();
        store.append_one(record).unwrap();
        assert_eq!(store.load().unwrap()[0].recorded_at().timestamp_micros(), micros);
    }

    #[test]
    fn test_schema_uses_established_column_names() {
        let schema = schema();
        for name in [
            "Problem",
            "Search Method",
            "Expansions",
            "Goal Tests",
            "New Nodes",
            "Plan Lenght",
            "Time",
            "Actions",
        ] {
            assert!(schema.field_with_name(name).is_ok(), "missing column {name}");
        }
    }

    #[test]
    fn test_append_empty_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("report.parquet"), "test");
        store.append(&[]).unwrap();
        assert!(!store.file_exists());
    }
}
