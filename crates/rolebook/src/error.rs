//! Error types for the Ledger.

use rolebook_core::CoreError;
use rolebook_perms::{FailureClass, PermsError};
use rolebook_store::{Revision, StoreError};
use thiserror::Error;

/// Errors that can occur during Ledger operations.
///
/// Every rejected call leaves the ledger exactly as it was.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Grant or revoke refused by the permission engine.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// Reader presented a revision other than the current one.
    #[error("stale revision: expected {expected}, current {current}")]
    StaleRevision {
        expected: Revision,
        current: Revision,
    },

    /// Page start index past the end of the active set.
    #[error("start index {start} out of bounds for {total} active records")]
    OutOfBounds { start: usize, total: usize },

    /// Signed call failed to verify or decode.
    #[error("invalid call: {0}")]
    InvalidCall(#[from] CoreError),

    /// Storage invariant violated.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl LedgerError {
    /// The caller-facing failure class, if this is a caller-facing failure.
    ///
    /// `Store` and `Config` errors are not outcomes of a call and have none.
    pub fn class(&self) -> Option<FailureClass> {
        match self {
            LedgerError::Permission(e) => Some(e.class()),
            LedgerError::StaleRevision { .. } | LedgerError::OutOfBounds { .. } => {
                Some(FailureClass::NotFound)
            }
            LedgerError::InvalidCall(_) => Some(FailureClass::Unauthorized),
            LedgerError::Store(_) | LedgerError::Config(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.class() == Some(FailureClass::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == Some(FailureClass::NotFound)
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
