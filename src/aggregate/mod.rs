//! One aggregation run: discover agents, fetch, merge, persist.
mod fetch;
mod merge;
mod persist;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::args::AggregateArgs;
use crate::discovery::{DnsResolver, PeerResolver, sort_peers};
use crate::error::AppResult;
use crate::report::AggregatedReport;

pub use fetch::{PeerPolicy, build_client, fetch_all, fetch_report};
pub use merge::merge_reports;
pub use persist::{persist_report, write_atomically};

/// Progress of an aggregation run. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatePhase {
    Idle,
    Discovering,
    Fetching,
    Merging,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for AggregatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Fetching => "fetching",
            Self::Merging => "merging",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct AggregateSettings {
    pub output: PathBuf,
    pub policies_id: String,
    pub fetch_timeout: Duration,
    pub concurrency: usize,
    pub sort_peers: bool,
    pub policy: PeerPolicy,
}

impl From<&AggregateArgs> for AggregateSettings {
    fn from(args: &AggregateArgs) -> Self {
        Self {
            output: args.output.clone(),
            policies_id: args.policies_id.clone(),
            fetch_timeout: args.fetch_timeout(),
            concurrency: args.concurrency.get(),
            sort_peers: args.sort_peers,
            policy: if args.allow_partial {
                PeerPolicy::AllowPartial
            } else {
                PeerPolicy::Strict
            },
        }
    }
}

pub struct Aggregator {
    resolver: Arc<dyn PeerResolver>,
    client: Client,
    settings: AggregateSettings,
    phase: AggregatePhase,
}

impl Aggregator {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(resolver: Arc<dyn PeerResolver>, settings: AggregateSettings) -> AppResult<Self> {
        let client = build_client(settings.fetch_timeout)?;
        Ok(Self {
            resolver,
            client,
            settings,
            phase: AggregatePhase::Idle,
        })
    }

    #[must_use]
    pub const fn phase(&self) -> AggregatePhase {
        self.phase
    }

    fn enter(&mut self, phase: AggregatePhase) {
        debug!("Aggregation {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Runs discovery, fetch, merge and persist for `service`.
    ///
    /// Any failing step ends the run in [`AggregatePhase::Failed`] without
    /// touching the output file.
    ///
    /// # Errors
    ///
    /// Returns the discovery, fetch or persist error that ended the run.
    pub async fn aggregate(&mut self, service: &str) -> AppResult<AggregatedReport> {
        self.phase = AggregatePhase::Idle;
        match self.run_steps(service).await {
            Ok(report) => {
                self.enter(AggregatePhase::Done);
                Ok(report)
            }
            Err(err) => {
                warn!("Aggregation failed while {}: {}", self.phase, err);
                self.enter(AggregatePhase::Failed);
                Err(err)
            }
        }
    }

    async fn run_steps(&mut self, service: &str) -> AppResult<AggregatedReport> {
        self.enter(AggregatePhase::Discovering);
        let mut peers = self.resolver.resolve_peers(service).await?;
        if self.settings.sort_peers {
            sort_peers(&mut peers);
        }
        info!("Discovered {} agents behind '{}'", peers.len(), service);

        self.enter(AggregatePhase::Fetching);
        let reports = fetch_all(
            &self.client,
            &peers,
            self.settings.concurrency,
            self.settings.fetch_timeout,
            self.settings.policy,
        )
        .await?;
        info!("Fetched {} of {} agent reports", reports.len(), peers.len());

        self.enter(AggregatePhase::Merging);
        let merged = merge_reports(&self.settings.policies_id, &reports);

        self.enter(AggregatePhase::Persisting);
        persist_report(&self.settings.output, &merged).await?;
        info!(
            "Wrote {} controls to '{}'",
            merged.len(),
            self.settings.output.display()
        );
        Ok(merged)
    }
}

/// Runs one aggregation from CLI arguments.
///
/// # Errors
///
/// Returns an error on invalid configuration or any failed step.
pub async fn run_aggregate(args: &AggregateArgs) -> AppResult<()> {
    args.validate()?;
    let service = args.service_name()?;
    let resolver = Arc::new(DnsResolver::new(args.agent_port));
    let mut aggregator = Aggregator::new(resolver, AggregateSettings::from(args))?;
    aggregator.aggregate(service).await.map(drop)
}
