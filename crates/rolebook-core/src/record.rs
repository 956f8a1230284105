//! Access records: who holds which role in which system.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::{self, Field};
use crate::crypto::Principal;
use crate::error::Result;
use crate::types::{Role, SystemId};

/// Uniqueness key of a record. At most one active record exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub system: SystemId,
    pub principal: Principal,
}

impl RecordKey {
    pub const fn new(system: SystemId, principal: Principal) -> Self {
        Self { system, principal }
    }
}

/// A single `(system, principal, role)` grant.
///
/// Records are never edited in place. Changing a role means revoking the
/// record and granting a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub system: SystemId,
    pub principal: Principal,
    pub role: Role,
}

impl Record {
    pub const fn new(system: SystemId, principal: Principal, role: Role) -> Self {
        Self {
            system,
            principal,
            role,
        }
    }

    /// The administrator record that bootstraps `system`.
    pub const fn admin(system: SystemId, principal: Principal) -> Self {
        Self::new(system, principal, Role::ADMIN)
    }

    pub const fn key(&self) -> RecordKey {
        RecordKey::new(self.system, self.principal)
    }

    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check all three fields against the given triple.
    pub fn matches(&self, system: SystemId, principal: &Principal, role: Role) -> bool {
        self.system == system && &self.principal == principal && self.role == role
    }

    /// Packed fields in canonical order: `system, principal, role`.
    pub fn fields(&self) -> [Field<'_>; 3] {
        [
            Field::Uint(self.system.get()),
            Field::Bytes(self.principal.as_bytes()),
            Field::Uint(self.role.get()),
        ]
    }

    /// Unpack the three record fields starting at item `at`.
    pub(crate) fn from_items(items: &[Value], at: usize) -> Result<Self> {
        Ok(Self::new(
            SystemId::new(canonical::uint_at(items, at)?),
            Principal::from_bytes(canonical::bytes_at(items, at + 1)?),
            Role::new(canonical::uint_at(items, at + 2)?),
        ))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.system, self.principal, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Record {
        Record::new(SystemId::new(9), Principal::from_bytes([0x11; 32]), Role::new(3))
    }

    #[test]
    fn test_key_ignores_role() {
        let a = sample();
        let b = Record::new(a.system, a.principal, Role::ADMIN);
        assert_eq!(a.key(), b.key());
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches_requires_exact_role() {
        let record = sample();
        assert!(record.matches(SystemId::new(9), &record.principal, Role::new(3)));
        assert!(!record.matches(SystemId::new(9), &record.principal, Role::new(4)));
        assert!(!record.matches(SystemId::new(8), &record.principal, Role::new(3)));
    }

    #[test]
    fn test_canonical_layout() {
        let bytes = canonical::encode_array(&sample().fields());
        // array(3), uint 9, bytes(32) header, 32 key bytes, uint 3
        assert_eq!(bytes.len(), 1 + 1 + 2 + 32 + 1);
        assert_eq!(bytes[0], 0x83);
        assert_eq!(bytes[1], 0x09);
        assert_eq!(&bytes[2..4], &[0x58, 0x20]);
        assert_eq!(bytes[36], 0x03);
    }

    #[test]
    fn test_unpack_at_offset() {
        let record = sample();
        let mut fields = vec![Field::Uint(42)];
        fields.extend(record.fields());
        let bytes = canonical::encode_array(&fields);
        let items = canonical::decode_array(&bytes, 4).unwrap();
        assert_eq!(Record::from_items(&items, 1).unwrap(), record);
        assert!(Record::from_items(&items, 0).is_err());
    }

    proptest! {
        #[test]
        fn prop_packing_distinguishes_roles(
            system in any::<u64>(),
            key in any::<[u8; 32]>(),
            role in any::<u64>(),
            other_role in any::<u64>(),
        ) {
            prop_assume!(role != other_role);
            let principal = Principal::from_bytes(key);
            let a = Record::new(SystemId::new(system), principal, Role::new(role));
            let b = Record::new(SystemId::new(system), principal, Role::new(other_role));
            prop_assert_eq!(a.key(), b.key());
            prop_assert_ne!(
                canonical::encode_array(&a.fields()),
                canonical::encode_array(&b.fields())
            );
        }
    }
}
