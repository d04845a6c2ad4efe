use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing service name. Set --service-name or SERVICE_NAME.")]
    MissingServiceName,
    #[error("Benchmark executable must not be empty.")]
    EmptyBenchmarkBin,
    #[error("Policies id must not be empty.")]
    EmptyPoliciesId,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Interval of {hours}h exceeds the maximum of {max}h.")]
    IntervalOverflow { hours: u64, max: u64 },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
