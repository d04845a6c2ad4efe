//! Core library for the `nodebench` CLI.
//!
//! The binary runs in one of two roles. The agent executes a compliance
//! benchmark on its node at a fixed interval and serves the latest parsed
//! report over HTTP. The aggregator discovers every agent through a headless
//! service, merges their reports into one cluster-wide document and writes it
//! atomically.
pub mod agent;
pub mod aggregate;
pub mod args;
pub mod benchmark;
pub mod discovery;
pub mod entry;
pub mod error;
pub mod logger;
pub mod report;
pub mod shutdown;
pub mod shutdown_handlers;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
#[cfg(test)]
mod test_support;
