//! Classification of accepted mutations.

use serde::{Deserialize, Serialize};

/// What an accepted grant does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantKind {
    /// First record of a system that did not exist.
    SystemCreation,
    /// New member of an existing system.
    MemberAddition,
}

/// What an accepted revoke did, known once the store reports the remaining
/// member count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevokeKind {
    /// The revoke removed the last member of its system.
    SystemRemoval,
    /// Other members of the system remain.
    MemberRemoval,
}

impl RevokeKind {
    pub fn from_remaining(remaining_in_system: u64) -> Self {
        if remaining_in_system == 0 {
            RevokeKind::SystemRemoval
        } else {
            RevokeKind::MemberRemoval
        }
    }
}
