//! Ledger configuration.

use serde::{Deserialize, Serialize};

use rolebook_perms::RevokePolicy;

use crate::error::Result;

/// Page size used when the configured value is `0`.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Configuration fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Maximum records per page. `0` selects [`DEFAULT_PAGE_SIZE`].
    pub page_size: u32,
    /// Extra rules applied to revokes.
    pub revoke_policy: RevokePolicy,
}

impl LedgerConfig {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn with_revoke_policy(mut self, policy: RevokePolicy) -> Self {
        self.revoke_policy = policy;
        self
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The page size the ledger will actually use.
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}
