//! Execution of the external benchmarking tool.
mod parse;

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::BenchmarkError;
use crate::report::NodeReport;

pub use parse::{parse_controls, parse_node_report};

/// Flag that switches the tool to one JSON record per category.
pub const MACHINE_OUTPUT_FLAG: &str = "--json";

/// Produces a fresh node snapshot.
#[async_trait]
pub trait BenchmarkRunner: Send + Sync {
    /// Runs one benchmark pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot run or its output cannot be parsed.
    async fn run(&self) -> Result<NodeReport, BenchmarkError>;
}

/// Runs the tool as a child process and parses stdout followed by stderr.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
    node_name: String,
    timeout: Duration,
}

impl CommandRunner {
    #[must_use]
    pub const fn new(
        program: String,
        args: Vec<String>,
        node_name: String,
        timeout: Duration,
    ) -> Self {
        Self {
            program,
            args,
            node_name,
            timeout,
        }
    }

    /// Runner invoking `program --json <extra_args...>`.
    #[must_use]
    pub fn with_machine_output(
        program: String,
        extra_args: &[String],
        node_name: String,
        timeout: Duration,
    ) -> Self {
        let mut args = Vec::with_capacity(extra_args.len().saturating_add(1));
        args.push(MACHINE_OUTPUT_FLAG.to_owned());
        args.extend(extra_args.iter().cloned());
        Self::new(program, args, node_name, timeout)
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    async fn capture_output(&self) -> Result<Vec<u8>, BenchmarkError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_elapsed| BenchmarkError::TimedOut {
                timeout: self.timeout,
            })?
            .map_err(|source| BenchmarkError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        debug!(
            "Benchmark tool exited with {} ({} bytes of output)",
            output.status,
            combined.len()
        );

        if !output.status.success() {
            return Err(BenchmarkError::ExitStatus {
                status: output.status,
                output: String::from_utf8_lossy(&combined).into_owned(),
            });
        }
        Ok(combined)
    }
}

#[async_trait]
impl BenchmarkRunner for CommandRunner {
    async fn run(&self) -> Result<NodeReport, BenchmarkError> {
        let output = self.capture_output().await?;
        parse_node_report(&self.node_name, &output)
    }
}
