//! Thin wrappers exposing parsing entry points to the fuzz targets.
use std::time::Duration;

use clap::Parser;

use crate::aggregate::merge_reports;
use crate::args::{AgentArgs, Cli, Command};
use crate::benchmark::parse_controls;
use crate::error::{AppError, AppResult};
use crate::report::{DEFAULT_POLICIES_ID, NodeReport};

/// Decodes raw benchmark tool output and returns the number of controls.
///
/// # Errors
///
/// Returns an error when the output is not a valid record stream.
pub fn parse_benchmark_output_input(output: &[u8]) -> AppResult<usize> {
    let controls = parse_controls(output).map_err(AppError::benchmark)?;
    Ok(controls.len())
}

/// Decodes an agent response body and merges it with itself, returning the
/// number of aggregated entries.
///
/// # Errors
///
/// Returns an error when the body is not a node report.
pub fn merge_agent_response_input(body: &[u8]) -> AppResult<usize> {
    let report: NodeReport = serde_json::from_slice(body)?;
    let merged = merge_reports(DEFAULT_POLICIES_ID, [&report, &report]);
    Ok(merged.len())
}

/// Parses agent timing flags the way the CLI does and returns the refresh
/// period and benchmark timeout.
///
/// # Errors
///
/// Returns an error when either value is invalid or the interval is too long.
pub fn agent_timings_input(
    interval_hours: &str,
    timeout_secs: &str,
) -> AppResult<(Duration, Duration)> {
    let parsed = AgentOnly::try_parse_from([
        "agent",
        "--interval-hours",
        interval_hours,
        "--benchmark-timeout-secs",
        timeout_secs,
    ])?;
    parsed.args.validate()?;
    Ok((parsed.args.refresh_interval()?, parsed.args.benchmark_timeout()))
}

#[derive(Debug, Parser)]
struct AgentOnly {
    #[command(flatten)]
    args: AgentArgs,
}

/// Parses command-line tokens and validates the selected role's settings.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn parse_cli_args_input<I, T>(args: I) -> AppResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    match cli.command {
        Command::Agent(args) => args.validate()?,
        Command::Aggregate(args) => args.validate()?,
    }
    Ok(())
}
