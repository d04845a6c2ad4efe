use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::benchmark::BenchmarkRunner;
use crate::error::BenchmarkError;
use crate::report::NodeReport;
use crate::shutdown::ShutdownReceiver;

use super::snapshot::SnapshotStore;

/// Runs the benchmark and publishes its result.
#[derive(Clone)]
pub struct BenchmarkAgent {
    runner: Arc<dyn BenchmarkRunner>,
    store: SnapshotStore,
}

impl BenchmarkAgent {
    #[must_use]
    pub fn new(runner: Arc<dyn BenchmarkRunner>, node_name: &str) -> Self {
        Self {
            runner,
            store: SnapshotStore::new(node_name),
        }
    }

    /// Runs one benchmark pass and publishes it on success.
    ///
    /// No lock is held while the tool runs. On failure the previous
    /// snapshot stays visible and the error is logged.
    ///
    /// # Errors
    ///
    /// Returns the runner's error after logging it.
    pub async fn refresh(&mut self) -> Result<usize, BenchmarkError> {
        match self.runner.run().await {
            Ok(report) => {
                let controls = report.controls.len();
                let refreshed_at = Utc::now();
                self.store.publish(report, refreshed_at);
                info!(
                    "Published benchmark snapshot with {} controls at {}",
                    controls,
                    refreshed_at.to_rfc3339()
                );
                Ok(controls)
            }
            Err(err) => {
                let last = self
                    .store
                    .current()
                    .refreshed_at
                    .map_or_else(|| "never".to_owned(), |at| at.to_rfc3339());
                warn!(
                    "Benchmark refresh failed, keeping snapshot from {}: {}",
                    last, err
                );
                Err(err)
            }
        }
    }

    /// Current report, or an empty one before the first successful refresh.
    #[must_use]
    pub fn snapshot(&mut self) -> NodeReport {
        self.store.report().clone()
    }

    /// Shared handle for readers such as the HTTP server.
    #[must_use]
    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }
}

/// Refreshes `agent` every `period` until shutdown.
///
/// The first tick fires one full period from now; the initial refresh is the
/// caller's. A period too long to schedule never ticks. Shutdown is only observed between refreshes, so a running
/// benchmark is never interrupted.
pub fn spawn_refresh_task(
    mut agent: BenchmarkAgent,
    period: Duration,
    mut shutdown_rx: ShutdownReceiver,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let Some(start) = Instant::now().checked_add(period) else {
            warn!(
                "Refresh period of {}s is out of range; no further refreshes scheduled",
                period.as_secs()
            );
            drop(shutdown_rx.recv().await);
            info!("Benchmark refresh task stopped");
            return;
        };
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {
                    drop(agent.refresh().await);
                }
            }
        }
        info!("Benchmark refresh task stopped");
    })
}
