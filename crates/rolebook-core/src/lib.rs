//! # Rolebook Core
//!
//! Pure primitives for Rolebook: principal identities, access records, and
//! signed mutation calls.
//!
//! This crate contains no storage and no authorization logic. It is pure
//! computation over the values every other crate passes around.
//!
//! ## Key Types
//!
//! - [`Record`] - A `(system, principal, role)` grant
//! - [`RecordKey`] - The `(system, principal)` uniqueness key of a record
//! - [`SystemId`] / [`Role`] - Partition and role tags (`0` is root / admin)
//! - [`Principal`] - An Ed25519 identity
//! - [`SignedCall`] - A grant or revoke request signed by its caller
//!
//! ## Canonicalization
//!
//! Records and calls encode to deterministic CBOR. See [`canonical`] module.

pub mod call;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod record;
pub mod types;

pub use call::{Call, CallId, CallKind, SignedCall, CALL_DOMAIN};
pub use crypto::{Blake3Hash, Keypair, Principal, Signature};
pub use error::{CoreError, Result};
pub use record::{Record, RecordKey};
pub use types::{Role, SystemId};
