//! In-memory implementation of the ActiveSet trait.
//!
//! Records are kept in a `Vec` in insertion order until a removal swaps the
//! last record into the freed slot. The index and per-system counters are
//! updated in the same call, so every lookup stays O(1).

use std::collections::HashMap;

use tracing::trace;

use rolebook_core::{Principal, Record, RecordKey, Role, SystemId};

use crate::error::{Result, StoreError};
use crate::traits::{ActiveSet, Removal};

/// Index entry for an active key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    role: Role,
    position: usize,
}

/// Active member counts for one system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SystemCounts {
    members: u64,
    admins: u64,
}

/// In-memory active-set store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// Dense array of active records.
    records: Vec<Record>,

    /// Index: (system, principal) -> role and position in `records`.
    index: HashMap<RecordKey, Slot>,

    /// Per-system counters. Systems with no members have no entry.
    systems: HashMap<SystemId, SystemCounts>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All active records in current array order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Verify that the array, index, and counters describe the same set.
    pub fn check_invariants(&self) -> Result<()> {
        if self.records.len() != self.index.len() {
            return Err(StoreError::Corrupted(format!(
                "{} records but {} index entries",
                self.records.len(),
                self.index.len()
            )));
        }

        let mut counted: HashMap<SystemId, SystemCounts> = HashMap::new();
        for (position, record) in self.records.iter().enumerate() {
            let slot = self.index.get(&record.key()).ok_or_else(|| {
                StoreError::Corrupted(format!("record at {position} missing from index"))
            })?;
            if slot.position != position || slot.role != record.role {
                return Err(StoreError::Corrupted(format!(
                    "index entry for position {position} points at {} with role {}",
                    slot.position, slot.role
                )));
            }
            let counts = counted.entry(record.system).or_default();
            counts.members += 1;
            if record.is_admin() {
                counts.admins += 1;
            }
        }

        if counted != self.systems {
            return Err(StoreError::Corrupted(
                "per-system counters disagree with records".into(),
            ));
        }

        Ok(())
    }
}

impl ActiveSet for MemoryStore {
    fn role_of(&self, system: SystemId, principal: &Principal) -> Option<Role> {
        self.index
            .get(&RecordKey::new(system, *principal))
            .map(|slot| slot.role)
    }

    fn position_of(&self, key: &RecordKey) -> Option<usize> {
        self.index.get(key).map(|slot| slot.position)
    }

    fn count_for(&self, system: SystemId) -> u64 {
        self.systems.get(&system).map_or(0, |c| c.members)
    }

    fn admins_for(&self, system: SystemId) -> u64 {
        self.systems.get(&system).map_or(0, |c| c.admins)
    }

    fn total_count(&self) -> usize {
        self.records.len()
    }

    fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    fn slice(&self, start: usize, len: usize) -> &[Record] {
        let start = start.min(self.records.len());
        let end = start.saturating_add(len).min(self.records.len());
        &self.records[start..end]
    }

    fn insert(&mut self, record: Record) -> Result<usize> {
        let key = record.key();
        if self.index.contains_key(&key) {
            return Err(StoreError::AlreadyActive(key));
        }

        let position = self.records.len();
        self.records.push(record);
        self.index.insert(
            key,
            Slot {
                role: record.role,
                position,
            },
        );

        let counts = self.systems.entry(record.system).or_default();
        counts.members += 1;
        if record.is_admin() {
            counts.admins += 1;
        }

        trace!(system = %record.system, principal = %record.principal, position, "inserted record");
        Ok(position)
    }

    fn remove(&mut self, system: SystemId, principal: &Principal) -> Result<Removal> {
        let key = RecordKey::new(system, *principal);
        let slot = self
            .index
            .remove(&key)
            .ok_or(StoreError::NotActive(key))?;

        let removed = self.records.swap_remove(slot.position);

        // swap_remove moved the former last element into the hole unless the
        // removed record was itself last.
        let moved = self.records.get(slot.position).copied();
        if let Some(moved) = moved {
            let moved_slot = self.index.get_mut(&moved.key()).ok_or_else(|| {
                StoreError::Corrupted(format!("moved record {moved} missing from index"))
            })?;
            moved_slot.position = slot.position;
            trace!(
                system = %moved.system,
                principal = %moved.principal,
                from = self.records.len(),
                to = slot.position,
                "swapped last record into freed slot"
            );
        }

        let remaining_in_system = match self.systems.get_mut(&system) {
            Some(counts) => {
                counts.members -= 1;
                if removed.is_admin() {
                    counts.admins -= 1;
                }
                let remaining = counts.members;
                if remaining == 0 {
                    self.systems.remove(&system);
                }
                remaining
            }
            None => {
                return Err(StoreError::Corrupted(format!(
                    "no counter for system {system}"
                )))
            }
        };

        Ok(Removal {
            removed,
            position: slot.position,
            moved,
            remaining_in_system,
        })
    }
}
