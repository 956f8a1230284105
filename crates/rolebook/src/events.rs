//! Events emitted by accepted mutations.
//!
//! Events are returned to the caller and logged; the ledger keeps no copy.

use serde::{Deserialize, Serialize};

use rolebook_core::Record;
use rolebook_perms::{GrantKind, RevokeKind};

/// Classified log entry for an accepted grant or revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A grant brought a new system into existence.
    SystemCreated(Record),
    /// A grant added a member to an existing system.
    MemberAdded(Record),
    /// A revoke removed the last member of a system.
    SystemRemoved(Record),
    /// A revoke removed a member; the system still exists.
    MemberRemoved(Record),
}

impl LedgerEvent {
    pub fn granted(kind: GrantKind, record: Record) -> Self {
        match kind {
            GrantKind::SystemCreation => LedgerEvent::SystemCreated(record),
            GrantKind::MemberAddition => LedgerEvent::MemberAdded(record),
        }
    }

    pub fn revoked(kind: RevokeKind, record: Record) -> Self {
        match kind {
            RevokeKind::SystemRemoval => LedgerEvent::SystemRemoved(record),
            RevokeKind::MemberRemoval => LedgerEvent::MemberRemoved(record),
        }
    }

    pub fn record(&self) -> &Record {
        match self {
            LedgerEvent::SystemCreated(r)
            | LedgerEvent::MemberAdded(r)
            | LedgerEvent::SystemRemoved(r)
            | LedgerEvent::MemberRemoved(r) => r,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::SystemCreated(_) => "SystemCreated",
            LedgerEvent::MemberAdded(_) => "MemberAdded",
            LedgerEvent::SystemRemoved(_) => "SystemRemoved",
            LedgerEvent::MemberRemoved(_) => "MemberRemoved",
        }
    }

    /// Whether the event created or removed a whole system.
    pub fn is_system_boundary(&self) -> bool {
        matches!(
            self,
            LedgerEvent::SystemCreated(_) | LedgerEvent::SystemRemoved(_)
        )
    }
}
