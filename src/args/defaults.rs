pub(crate) const DEFAULT_USER_AGENT: &str = concat!("nodebench/", env!("CARGO_PKG_VERSION"));

pub(super) const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub(super) const DEFAULT_AGENT_PORT: u16 = 8080;
pub(super) const DEFAULT_INTERVAL_HOURS: &str = "2";
pub(super) const DEFAULT_BENCHMARK_BIN: &str = "kube-bench";
pub(super) const DEFAULT_BENCHMARK_TIMEOUT_SECS: &str = "1800";
pub(super) const DEFAULT_OUTPUT_PATH: &str = "/var/lib/nodebench/report.json";
pub(super) const DEFAULT_FETCH_TIMEOUT_SECS: &str = "30";
pub(super) const DEFAULT_FETCH_CONCURRENCY: &str = "8";
