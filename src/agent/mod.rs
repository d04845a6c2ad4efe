//! Per-node benchmark agent: scheduled refresh plus the report endpoint.
mod http;
mod refresh;
mod snapshot;

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use crate::args::AgentArgs;
use crate::benchmark::CommandRunner;
use crate::error::{AgentError, AppError, AppResult};
use crate::shutdown::ShutdownSender;
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

pub use http::serve;
pub use refresh::{BenchmarkAgent, spawn_refresh_task};
pub use snapshot::{Snapshot, SnapshotStore};

/// Runs the agent until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the listen address
/// cannot be bound. Benchmark failures are logged and never end the agent.
pub async fn run_agent(args: &AgentArgs) -> AppResult<()> {
    args.validate()?;
    let period = args.refresh_interval()?;

    let listener = TcpListener::bind(&args.listen).await.map_err(|err| {
        AppError::agent(AgentError::Bind {
            addr: args.listen.clone(),
            source: err,
        })
    })?;
    info!(
        "Agent for node '{}' listening on {} (benchmark every {}h)",
        args.node_name, args.listen, args.interval_hours
    );

    let runner = CommandRunner::with_machine_output(
        args.benchmark_bin.clone(),
        &args.benchmark_args,
        args.node_name.clone(),
        args.benchmark_timeout(),
    );
    info!(
        "Benchmark command: {} {}",
        runner.program(),
        runner.args().join(" ")
    );
    let agent = BenchmarkAgent::new(Arc::new(runner), &args.node_name);

    let (shutdown_tx, _) = shutdown_channel();
    let signal_task = setup_signal_shutdown_handler(&shutdown_tx);
    let result = run_agent_on(agent, listener, period, &shutdown_tx).await;
    drop(shutdown_tx.send(()));
    signal_task.await?;
    result
}

/// Runs the initial refresh, then serves and refreshes until shutdown.
///
/// Connections arriving during the initial refresh wait in the listen
/// backlog, so the first request sees the first report if the tool succeeds.
///
/// # Errors
///
/// Returns an error if the refresh task panicked.
pub async fn run_agent_on(
    mut agent: BenchmarkAgent,
    listener: TcpListener,
    period: Duration,
    shutdown_tx: &ShutdownSender,
) -> AppResult<()> {
    let refresh_rx = shutdown_tx.subscribe();
    let serve_rx = shutdown_tx.subscribe();

    drop(agent.refresh().await);

    let store = agent.store();
    let refresh_task = spawn_refresh_task(agent, period, refresh_rx);
    serve(listener, store, serve_rx).await;
    refresh_task.await?;
    info!("Agent stopped");
    Ok(())
}
