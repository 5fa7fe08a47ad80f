//! Error types shared by both solvers
//!
//! Per the IO envelope contract, every one of these is caught at the
//! process boundary and serialized as `{"status": "error", "message": ...}`
//! rather than propagated as a non-zero exit code. Infeasibility is
//! reported separately (see `belts::BeltsResponse`/`factory::FactoryResponse`)
//! since it is a first-class result, not an error.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or solving a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The request document did not parse as valid JSON
    #[error("invalid JSON input: {0}")]
    MalformedInput(String),

    /// A required field was missing or a value failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A max-flow instance admitted unbounded flow between super-source and
    /// super-sink, which the belts transformation should never produce
    #[error("unbounded flow: {0}")]
    UnboundedFlow(String),

    /// Internal error (bug): an invariant the solver relies on did not hold
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a malformed-input error
    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Create an unbounded-flow error
    pub fn unbounded_flow(msg: impl Into<String>) -> Self {
        Self::UnboundedFlow(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
