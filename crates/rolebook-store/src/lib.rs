//! # Rolebook Store
//!
//! Storage of the active record set and the revision marker that guards
//! readers against reordering.
//!
//! ## Overview
//!
//! Active records live in a dense array. Removal is swap-and-pop: the last
//! element is moved into the freed slot, so removal is O(1) but positions
//! are not stable across mutations. A side index maps each
//! `(system, principal)` key to its role and current position, and a
//! per-system counter tracks whether a system still exists.
//!
//! ## Key Types
//!
//! - [`ActiveSet`] - The storage trait used by the permission engine
//! - [`MemoryStore`] - In-memory swap-and-pop implementation
//! - [`RevisionTracker`] - Monotonic freshness marker
//! - [`HeightSource`] - Where the host's current block height comes from
//!
//! ## Usage
//!
//! ```rust
//! use rolebook_core::{Principal, Record, Role, SystemId};
//! use rolebook_store::{ActiveSet, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let alice = Principal::from_bytes([1; 32]);
//! store.insert(Record::admin(SystemId::ROOT, alice)).unwrap();
//!
//! assert_eq!(store.role_of(SystemId::ROOT, &alice), Some(Role::ADMIN));
//! assert_eq!(store.count_for(SystemId::ROOT), 1);
//! ```

pub mod error;
pub mod memory;
pub mod revision;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use revision::{HeightSource, ManualHeight, Revision, RevisionTracker};
pub use traits::{ActiveSet, Removal};
