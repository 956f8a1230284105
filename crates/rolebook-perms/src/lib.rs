//! # Rolebook Permissions
//!
//! The authorization state machine deciding whether a grant or revoke may
//! proceed.
//!
//! ## Rules
//!
//! Granting into a system that does not exist yet creates it. Only root
//! administrators may do this, and the first grant must be an administrator
//! grant. Granting into an existing system requires the caller to be a
//! member of it, and granting the administrator role requires the caller to
//! be an administrator there. A key that already holds a record cannot be
//! granted again.
//!
//! Revoking requires the caller to name the record's exact current role and
//! to be a member of the system. Revoking an administrator requires the
//! caller to be an administrator of that system.
//!
//! The engine only decides. Applying the decision to the store is the
//! caller's job, which keeps every check side-effect free.
//!
//! ## Usage
//!
//! ```rust
//! use rolebook_core::{Principal, Record, Role, SystemId};
//! use rolebook_perms::{Engine, GrantKind};
//! use rolebook_store::{ActiveSet, MemoryStore};
//!
//! let root = Principal::from_bytes([1; 32]);
//! let mut store = MemoryStore::new();
//! store.insert(Record::admin(SystemId::ROOT, root)).unwrap();
//!
//! let engine = Engine::default();
//! let new_system = Record::admin(SystemId::new(5), Principal::from_bytes([2; 32]));
//! assert_eq!(
//!     engine.authorize_grant(&store, &root, &new_system).unwrap(),
//!     GrantKind::SystemCreation,
//! );
//! ```

pub mod engine;
pub mod error;
pub mod outcome;
pub mod policy;

pub use engine::Engine;
pub use error::{FailureClass, PermsError, Result};
pub use outcome::{GrantKind, RevokeKind};
pub use policy::RevokePolicy;
