mod agent;
mod aggregate;
mod app;
mod benchmark;
mod validation;

#[cfg(test)]
mod test_support;

pub use agent::AgentError;
pub use aggregate::{DiscoveryError, FetchError, PersistError};
pub use app::{AppError, AppResult};
pub use benchmark::BenchmarkError;
pub use validation::ValidationError;
