//! plan-bench command-line entry point

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use plan_bench::config::HarnessConfig;
use plan_bench::report::ComparisonReport;
use plan_bench::suite::Suite;
use tracing_subscriber::EnvFilter;

/// Benchmark search methods on planning problems, resuming from stored results.
#[derive(Parser, Debug)]
#[command(name = "plan-bench")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  plan-bench                         Run the full suite into data/search_report.parquet
  plan-bench --suite uninformed      Run only the uninformed methods
  plan-bench --report-only           Render stored results without running anything
  RUST_LOG=debug plan-bench          Also log already-measured skips")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Result table path
    #[arg(short = 'o', long, env = "PLAN_BENCH_OUTPUT")]
    output: Option<PathBuf>,

    /// Partition within the result table
    #[arg(short = 'p', long)]
    partition: Option<String>,

    /// Experiment suite to run
    #[arg(long, value_enum)]
    suite: Option<Suite>,

    /// Render the comparison report after the pass
    #[arg(long)]
    report: bool,

    /// Render the comparison report without running anything
    #[arg(long, conflicts_with = "report")]
    report_only: bool,

    /// Report output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn harness_config(&self) -> Result<HarnessConfig> {
        let base = match &self.config {
            Some(path) => HarnessConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => HarnessConfig::default(),
        };

        let mut builder = base.to_builder();
        if let Some(output) = &self.output {
            builder = builder.output(output.clone());
        }
        if let Some(partition) = &self.partition {
            builder = builder.partition(partition.clone());
        }
        if let Some(suite) = self.suite {
            builder = builder.suite(suite);
        }
        if self.report {
            builder = builder.report(true);
        }
        Ok(builder.build()?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = cli.harness_config()?;
    let driver = config.driver();

    if !cli.report_only {
        driver.run().with_context(|| {
            format!(
                "Experiment pass failed; rows stored so far remain in {}",
                config.output().display()
            )
        })?;
    }

    if cli.report_only || config.report() {
        let report = ComparisonReport::load(driver.store())
            .with_context(|| format!("Failed to load results from {}", config.output().display()))?;
        match cli.format {
            Format::Text => print!("{}", report.render_text()),
            Format::Json => println!("{}", report.render_json()?),
        }
    }

    Ok(())
}
