use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to resolve service '{service}': {source}")]
    Resolve {
        service: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Service '{service}' resolved to no addresses.")]
    NoPeers { service: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid agent URL for {addr}: {source}")]
    InvalidUrl {
        addr: SocketAddr,
        #[source]
        source: url::ParseError,
    },
    #[error("Request to agent {addr} failed: {source}")]
    Request {
        addr: SocketAddr,
        #[source]
        source: reqwest::Error,
    },
    #[error("Agent {addr} did not answer within {}s.", .timeout.as_secs())]
    TimedOut { addr: SocketAddr, timeout: Duration },
    #[error("Agent {addr} responded with HTTP {status}.")]
    Status { addr: SocketAddr, status: u16 },
    #[error("Agent {addr} returned an undecodable report: {source}")]
    Decode {
        addr: SocketAddr,
        #[source]
        source: reqwest::Error,
    },
    #[error("None of the {peers} peers returned a report.")]
    NoReports { peers: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Output path '{path}' has no file name.")]
    InvalidPath { path: PathBuf },
    #[error("Failed to serialize aggregated report: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to {context} '{path}': {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Report writer task failed: {source}")]
    Join {
        #[source]
        source: tokio::task::JoinError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
}
