//! Error types for Rolebook Core.

use thiserror::Error;

/// Errors raised while encoding, decoding, or verifying core values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("unknown call kind tag: {0}")]
    UnknownCallKind(u64),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
