use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised from inside tool bodies.
///
/// These are never caught by the runner; they surface from `Runner::run`
/// wrapped in an `anyhow::Error` and can be recovered with `downcast_ref`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum SwarmError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SwarmResult<T> = Result<T, SwarmError>;
