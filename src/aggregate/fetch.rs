use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::FetchError;
use crate::report::NodeReport;

/// HTTP client whose every request is bounded by `timeout`.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .no_proxy()
        .build()
        .map_err(|source| FetchError::ClientBuild { source })
}

fn agent_url(addr: SocketAddr) -> Result<Url, FetchError> {
    Url::parse(&format!("http://{}/", addr))
        .map_err(|source| FetchError::InvalidUrl { addr, source })
}

fn request_error(addr: SocketAddr, timeout: Duration, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::TimedOut { addr, timeout }
    } else if source.is_decode() {
        FetchError::Decode { addr, source }
    } else {
        FetchError::Request { addr, source }
    }
}

/// Fetches one agent's current report.
///
/// # Errors
///
/// Returns an error if the agent is unreachable, times out, answers with a
/// non-2xx status, or sends a body that is not a node report.
pub async fn fetch_report(
    client: &Client,
    addr: SocketAddr,
    timeout: Duration,
) -> Result<NodeReport, FetchError> {
    let response = client
        .get(agent_url(addr)?)
        .send()
        .await
        .map_err(|source| request_error(addr, timeout, source))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            addr,
            status: status.as_u16(),
        });
    }
    let report = response
        .json::<NodeReport>()
        .await
        .map_err(|source| request_error(addr, timeout, source))?;
    debug!(
        "Fetched {} controls for node '{}' from {}",
        report.controls.len(),
        report.name,
        addr
    );
    Ok(report)
}

/// How [`fetch_all`] treats agents that cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerPolicy {
    /// Any failure aborts the whole fetch.
    Strict,
    /// Failures are logged and the peer is skipped.
    AllowPartial,
}

/// Fetches every peer with at most `concurrency` requests in flight.
///
/// Reports come back in `peers` order regardless of completion order. Under
/// [`PeerPolicy::Strict`] the first failure cancels the remaining requests.
///
/// # Errors
///
/// Returns the first fetch failure in strict mode, or
/// [`FetchError::NoReports`] when no peer produced a report.
pub async fn fetch_all(
    client: &Client,
    peers: &[SocketAddr],
    concurrency: usize,
    timeout: Duration,
    policy: PeerPolicy,
) -> Result<Vec<NodeReport>, FetchError> {
    let mut results = stream::iter(peers.iter().copied())
        .map(|addr| async move { (addr, fetch_report(client, addr, timeout).await) })
        .buffered(concurrency.max(1));

    let mut reports = Vec::with_capacity(peers.len());
    while let Some((addr, result)) = results.next().await {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => match policy {
                PeerPolicy::Strict => return Err(err),
                PeerPolicy::AllowPartial => warn!("Skipping agent {}: {}", addr, err),
            },
        }
    }

    if reports.is_empty() {
        return Err(FetchError::NoReports { peers: peers.len() });
    }
    Ok(reports)
}
