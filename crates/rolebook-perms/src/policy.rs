//! Tunable revoke rules.

use serde::{Deserialize, Serialize};

/// Policy applied on top of the base revoke rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevokePolicy {
    /// Refuse to revoke the last administrator of the root system.
    ///
    /// With no root administrator left, no new system could ever be created.
    pub protect_last_root_admin: bool,
}

impl Default for RevokePolicy {
    fn default() -> Self {
        Self {
            protect_last_root_admin: true,
        }
    }
}

impl RevokePolicy {
    /// Allow the root system to lose its last administrator.
    pub fn permissive() -> Self {
        Self {
            protect_last_root_admin: false,
        }
    }
}
