//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::{AgentArgs, AggregateArgs, Cli, Command};
pub use types::{PositiveU64, PositiveUsize};

pub(crate) use defaults::DEFAULT_USER_AGENT;
