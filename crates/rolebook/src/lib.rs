//! # Rolebook
//!
//! A self-describing access-control ledger: which principals hold which
//! role in which system, with grant/revoke mutation and paginated replay of
//! the active grants.
//!
//! ## Overview
//!
//! - **Systems** are partitions identified by integers. System `0` is the
//!   root; its administrators may bring new systems into existence.
//! - **Records** are `(system, principal, role)` grants. Role `0` is the
//!   administrator role. At most one record exists per `(system, principal)`.
//! - **Revisions** are stamped on every accepted mutation. Readers must
//!   present the current revision, because removals reorder the active set.
//!
//! ## Usage
//!
//! ```rust
//! use rolebook::{Ledger, LedgerConfig, LedgerEvent};
//! use rolebook::core::{Principal, Role, SystemId};
//! use rolebook::store::ManualHeight;
//!
//! let root = Principal::from_bytes([1; 32]);
//! let alice = Principal::from_bytes([2; 32]);
//! let host = ManualHeight::new(1_000);
//!
//! let mut ledger = Ledger::new(root, LedgerConfig::with_page_size(10), host.clone()).unwrap();
//!
//! // Root administrators create systems by granting their first administrator.
//! let event = ledger.grant(&root, SystemId::new(7), alice, Role::ADMIN).unwrap();
//! assert!(matches!(event, LedgerEvent::SystemCreated(_)));
//!
//! // Readers page through the active set at the current revision.
//! let page = ledger.page(0, ledger.current_revision()).unwrap();
//! assert_eq!(page.records.len(), 2);
//! assert_eq!(page.next_index, 0);
//! ```
//!
//! ## Re-exports
//!
//! - `rolebook::core` - Records, principals, signed calls
//! - `rolebook::store` - Active-set storage and revisions
//! - `rolebook::perms` - Authorization rules

pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod reader;

// Re-export component crates
pub use rolebook_core as core;
pub use rolebook_perms as perms;
pub use rolebook_store as store;

pub use config::{LedgerConfig, DEFAULT_PAGE_SIZE};
pub use error::{LedgerError, Result};
pub use events::LedgerEvent;
pub use ledger::Ledger;
pub use reader::{read_page, Page, PageCursor};

// Commonly used types
pub use rolebook_core::{Call, Keypair, Principal, Record, Role, SignedCall, SystemId};
pub use rolebook_perms::{FailureClass, RevokePolicy};
pub use rolebook_store::{ActiveSet, HeightSource, ManualHeight, MemoryStore, Revision};
