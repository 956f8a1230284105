//! ActiveSet trait: the interface the permission engine mutates through.
//!
//! All operations are synchronous and O(1) apart from `slice`, which is
//! linear in the slice length.

use rolebook_core::{Principal, Record, RecordKey, Role, SystemId};

use crate::error::Result;

/// What a swap-and-pop removal did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The record that was removed.
    pub removed: Record,
    /// Position the removed record occupied.
    pub position: usize,
    /// The former last record, now at `position`, if it had to move.
    pub moved: Option<Record>,
    /// Active members left in the removed record's system.
    pub remaining_in_system: u64,
}

impl Removal {
    /// True when the removal emptied its system.
    pub fn emptied_system(&self) -> bool {
        self.remaining_in_system == 0
    }
}

/// Dense, duplicate-free set of active records.
pub trait ActiveSet {
    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether `(system, principal)` has an active record.
    fn exists(&self, system: SystemId, principal: &Principal) -> bool {
        self.role_of(system, principal).is_some()
    }

    /// Role of the active record for `(system, principal)`, if any.
    fn role_of(&self, system: SystemId, principal: &Principal) -> Option<Role>;

    /// Current array position of the record for `key`.
    fn position_of(&self, key: &RecordKey) -> Option<usize>;

    /// The active record for `key`, if any.
    fn find(&self, key: &RecordKey) -> Option<&Record> {
        self.position_of(key).and_then(|position| self.get(position))
    }

    /// Number of active records in `system`. Zero means the system does not exist.
    fn count_for(&self, system: SystemId) -> u64;

    /// Number of active administrator records in `system`.
    fn admins_for(&self, system: SystemId) -> u64;

    /// Number of active records across all systems.
    fn total_count(&self) -> usize;

    /// Record at `position`, in current array order.
    fn get(&self, position: usize) -> Option<&Record>;

    /// Up to `len` records starting at `start`, in current array order.
    ///
    /// Returns an empty slice when `start` is at or past the end.
    fn slice(&self, start: usize, len: usize) -> &[Record];

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a record. Fails if its key already has an active record.
    fn insert(&mut self, record: Record) -> Result<usize>;

    /// Swap-and-pop the record for `(system, principal)`.
    fn remove(&mut self, system: SystemId, principal: &Principal) -> Result<Removal>;
}
