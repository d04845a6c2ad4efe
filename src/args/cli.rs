use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::error::ValidationError;
use crate::report::DEFAULT_POLICIES_ID;

use super::defaults::{
    DEFAULT_AGENT_PORT, DEFAULT_BENCHMARK_BIN, DEFAULT_BENCHMARK_TIMEOUT_SECS,
    DEFAULT_FETCH_CONCURRENCY, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_INTERVAL_HOURS, DEFAULT_LISTEN,
    DEFAULT_OUTPUT_PATH,
};
use super::parsers::{parse_positive_u64, parse_positive_usize};
use super::types::{PositiveU64, PositiveUsize};

const SECONDS_PER_HOUR: u64 = 60 * 60;
/// One hundred years; longer periods cannot be scheduled on every platform.
const MAX_INTERVAL_HOURS: u64 = 100 * 365 * 24;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Per-node compliance benchmark agent and cluster-wide report aggregator."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by NODEBENCH_LOG / RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the benchmark on a schedule and serve the latest report
    Agent(AgentArgs),
    /// Fetch every agent's report and write the merged cluster report
    Aggregate(AggregateArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AgentArgs {
    /// Name reported for this node
    #[arg(long = "node-name", env = "NODE_NAME", default_value = "")]
    pub node_name: String,

    /// Hours between benchmark runs
    #[arg(
        long = "interval-hours",
        env = "BENCHMARK_INTERVAL_HOURS",
        default_value = DEFAULT_INTERVAL_HOURS,
        value_parser = parse_positive_u64
    )]
    pub interval_hours: PositiveU64,

    /// Address the report endpoint listens on
    #[arg(long, env = "NODEBENCH_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Benchmark executable (invoked with --json)
    #[arg(long = "benchmark-bin", env = "BENCHMARK_BIN", default_value = DEFAULT_BENCHMARK_BIN)]
    pub benchmark_bin: String,

    /// Extra benchmark argument (repeatable; comma-separated in the environment)
    #[arg(
        long = "benchmark-arg",
        env = "BENCHMARK_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub benchmark_args: Vec<String>,

    /// Seconds a benchmark run may take before it is killed
    #[arg(
        long = "benchmark-timeout-secs",
        env = "BENCHMARK_TIMEOUT_SECS",
        default_value = DEFAULT_BENCHMARK_TIMEOUT_SECS,
        value_parser = parse_positive_u64
    )]
    pub benchmark_timeout_secs: PositiveU64,
}

impl AgentArgs {
    /// Refresh period derived from `--interval-hours`.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour count exceeds one hundred years.
    pub fn refresh_interval(&self) -> Result<Duration, ValidationError> {
        let hours = self.interval_hours.get();
        hours
            .checked_mul(SECONDS_PER_HOUR)
            .filter(|_| hours <= MAX_INTERVAL_HOURS)
            .map(Duration::from_secs)
            .ok_or(ValidationError::IntervalOverflow {
                hours,
                max: MAX_INTERVAL_HOURS,
            })
    }

    #[must_use]
    pub const fn benchmark_timeout(&self) -> Duration {
        Duration::from_secs(self.benchmark_timeout_secs.get())
    }

    /// Rejects settings that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns an error if the benchmark executable is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.benchmark_bin.trim().is_empty() {
            return Err(ValidationError::EmptyBenchmarkBin);
        }
        self.refresh_interval().map(drop)
    }
}

#[derive(Debug, Args, Clone)]
pub struct AggregateArgs {
    /// Headless service whose addresses are the agents
    #[arg(long = "service-name", env = "SERVICE_NAME")]
    pub service_name: Option<String>,

    /// Port the agents listen on
    #[arg(long = "agent-port", env = "AGENT_PORT", default_value_t = DEFAULT_AGENT_PORT)]
    pub agent_port: u16,

    /// Path of the merged report
    #[arg(long, short, env = "NODEBENCH_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Category id treated as cluster-wide instead of per node
    #[arg(long = "policies-id", env = "POLICIES_ID", default_value = DEFAULT_POLICIES_ID)]
    pub policies_id: String,

    /// Seconds to wait for each agent
    #[arg(
        long = "fetch-timeout-secs",
        env = "FETCH_TIMEOUT_SECS",
        default_value = DEFAULT_FETCH_TIMEOUT_SECS,
        value_parser = parse_positive_u64
    )]
    pub fetch_timeout_secs: PositiveU64,

    /// Agents fetched at the same time
    #[arg(
        long,
        env = "FETCH_CONCURRENCY",
        default_value = DEFAULT_FETCH_CONCURRENCY,
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Merge agents in address order instead of resolver order
    #[arg(long = "sort-peers", env = "SORT_PEERS")]
    pub sort_peers: bool,

    /// Skip unreachable agents instead of failing the run
    #[arg(long = "allow-partial", env = "ALLOW_PARTIAL")]
    pub allow_partial: bool,
}

impl AggregateArgs {
    /// The configured service name, trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the service name is missing or blank.
    pub fn service_name(&self) -> Result<&str, ValidationError> {
        self.service_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingServiceName)
    }

    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.get())
    }

    /// Rejects settings that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns an error if the service name or policies id is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service_name()?;
        if self.policies_id.is_empty() {
            return Err(ValidationError::EmptyPoliciesId);
        }
        Ok(())
    }
}
