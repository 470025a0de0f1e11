//! Harness configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::air_cargo::AirCargoProblem;
use crate::experiment::ExperimentDriver;
use crate::storage::ResultStore;
use crate::suite::Suite;
use crate::{Error, Result};

/// Default result table location.
pub const DEFAULT_OUTPUT: &str = "data/search_report.parquet";

/// Default partition within the result table.
pub const DEFAULT_PARTITION: &str = "test";

/// Settings for one harness invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    output: PathBuf,
    partition: String,
    suite: Suite,
    report: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            partition: DEFAULT_PARTITION.to_string(),
            suite: Suite::default(),
            report: false,
        }
    }
}

impl HarnessConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    /// Load a JSON config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Start a builder from this config, for layering overrides.
    #[must_use]
    pub fn to_builder(&self) -> HarnessConfigBuilder {
        HarnessConfigBuilder {
            config: self.clone(),
        }
    }

    /// Get the result table path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Get the partition name.
    #[must_use]
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Get the suite.
    #[must_use]
    pub const fn suite(&self) -> Suite {
        self.suite
    }

    /// Whether to render the report after the pass.
    #[must_use]
    pub const fn report(&self) -> bool {
        self.report
    }

    /// Open the configured result store.
    #[must_use]
    pub fn store(&self) -> ResultStore {
        ResultStore::new(self.output.clone(), self.partition.clone())
    }

    /// Build a driver over the configured suite and store.
    #[must_use]
    pub fn driver(&self) -> ExperimentDriver<AirCargoProblem> {
        ExperimentDriver::new(self.suite.matrix(), self.suite.exclusions(), self.store())
    }
}

/// Builder for `HarnessConfig`.
#[derive(Debug, Default)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Set the result table path.
    #[must_use]
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    /// Set the partition name.
    #[must_use]
    pub fn partition(mut self, partition: impl Into<String>) -> Self {
        self.config.partition = partition.into();
        self
    }

    /// Set the suite.
    #[must_use]
    pub const fn suite(mut self, suite: Suite) -> Self {
        self.config.suite = suite;
        self
    }

    /// Render the report after the pass.
    #[must_use]
    pub const fn report(mut self, report: bool) -> Self {
        self.config.report = report;
        self
    }

    /// Build the `HarnessConfig`.
    ///
    /// # Errors
    ///
    /// Returns error if the partition name is empty.
    pub fn build(self) -> Result<HarnessConfig> {
        if self.config.partition.trim().is_empty() {
            return Err(Error::Config("partition name must not be empty".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::builder().build().unwrap();
        assert_eq!(config.output(), Path::new(DEFAULT_OUTPUT));
        assert_eq!(config.partition(), "test");
        assert_eq!(config.suite(), Suite::Full);
        assert!(!config.report());
    }

    #[test]
    fn test_builder_overrides() {
        let config = HarnessConfig::builder()
            .output("out/r.parquet")
            .partition("nightly")
            .suite(Suite::Uninformed)
            .report(true)
            .build()
            .unwrap();
        assert_eq!(config.output(), Path::new("out/r.parquet"));
        assert_eq!(config.partition(), "nightly");
        assert_eq!(config.suite(), Suite::Uninformed);
        assert!(config.report());
    }

    #[test]
    fn test_empty_partition_rejected() {
        let err = HarnessConfig::builder().partition("  ").build().unwrap_err();
        assert!(err.to_string().contains("partition"));
    }

    #[test]
    fn test_json_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");
        fs::write(&path, r#"{"suite": "uninformed", "partition": "ci"}"#).unwrap();

        let config = HarnessConfig::from_json_file(&path).unwrap();
        assert_eq!(config.suite(), Suite::Uninformed);
        assert_eq!(config.partition(), "ci");
        assert_eq!(config.output(), Path::new(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_json_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            HarnessConfig::from_json_file(&path),
            Err(Error::Config(_))
        ));
    }
}
