use clap::{CommandFactory, FromArgMatches};

use crate::agent::run_agent;
use crate::aggregate::run_aggregate;
use crate::args::{Cli, Command};
use crate::error::AppResult;

/// Parses the command line, sets up logging and runs the chosen role to
/// completion on a multi-threaded runtime.
///
/// # Errors
///
/// Returns the error that ended the agent or the aggregation run.
pub fn run() -> AppResult<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    crate::logger::init_logging(cli.verbose, cli.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(cli.command))
}

async fn run_async(command: Command) -> AppResult<()> {
    match command {
        Command::Agent(args) => run_agent(&args).await,
        Command::Aggregate(args) => run_aggregate(&args).await,
    }
}
