//! Error types for the permissions module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two failure classes a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureClass {
    /// The record, system, or cursor position asked for does not exist.
    NotFound,
    /// The caller lacks the standing for the request.
    Unauthorized,
}

/// Errors that can occur while authorizing a mutation.
#[derive(Debug, Error)]
pub enum PermsError {
    /// Caller lacks the required membership or role.
    #[error("permission denied: {0}")]
    Unauthorized(String),

    /// Target record or system does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl PermsError {
    pub fn class(&self) -> FailureClass {
        match self {
            PermsError::Unauthorized(_) => FailureClass::Unauthorized,
            PermsError::NotFound(_) => FailureClass::NotFound,
        }
    }
}

/// Result type for permission checks.
pub type Result<T> = std::result::Result<T, PermsError>;
