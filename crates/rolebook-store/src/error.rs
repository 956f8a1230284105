//! Error types for the store module.

use rolebook_core::RecordKey;
use thiserror::Error;

/// Errors raised by the active-set store.
///
/// Both variants are precondition violations: callers check existence
/// before inserting or removing, so seeing one of these means the caller
/// has a bug.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert of a key that already has an active record.
    #[error("record already active for system {} principal {}", .0.system, .0.principal)]
    AlreadyActive(RecordKey),

    /// Remove of a key with no active record.
    #[error("no active record for system {} principal {}", .0.system, .0.principal)]
    NotActive(RecordKey),

    /// Index, array, and counters disagree.
    #[error("store invariant violated: {0}")]
    Corrupted(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
