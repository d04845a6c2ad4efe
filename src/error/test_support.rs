use super::{AgentError, BenchmarkError, FetchError, PersistError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for AgentError {
    fn from(message: &'static str) -> Self {
        AgentError::TestExpectation { message }
    }
}

impl From<String> for AgentError {
    fn from(value: String) -> Self {
        AgentError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for BenchmarkError {
    fn from(message: &'static str) -> Self {
        BenchmarkError::TestExpectation { message }
    }
}

impl From<&'static str> for super::AppError {
    fn from(message: &'static str) -> Self {
        super::AppError::validation(message)
    }
}

impl From<&'static str> for FetchError {
    fn from(message: &'static str) -> Self {
        FetchError::TestExpectation { message }
    }
}

impl From<&'static str> for PersistError {
    fn from(message: &'static str) -> Self {
        PersistError::TestExpectation { message }
    }
}
