use thiserror::Error;

use super::{
    AgentError, BenchmarkError, DiscoveryError, FetchError, PersistError, ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Benchmark error: {0}")]
    Benchmark(#[from] BenchmarkError),
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn benchmark<E>(error: E) -> Self
    where
        E: Into<BenchmarkError>,
    {
        error.into().into()
    }

    pub fn agent<E>(error: E) -> Self
    where
        E: Into<AgentError>,
    {
        error.into().into()
    }
}
