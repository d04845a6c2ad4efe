use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Failed to start benchmark tool '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Benchmark tool exited with {status}. Output:\n{output}")]
    ExitStatus { status: ExitStatus, output: String },
    #[error("Benchmark tool did not finish within {}s.", .timeout.as_secs())]
    TimedOut { timeout: Duration },
    #[error("Failed to decode control record #{index}: {source}")]
    Parse {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Control record #{index} has an empty id.")]
    EmptyControlId { index: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
}

impl BenchmarkError {
    /// Whether the tool produced output that could not be decoded, as opposed
    /// to failing to run at all.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::EmptyControlId { .. })
    }
}
