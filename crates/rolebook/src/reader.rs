//! Freshness-guarded pagination over the active set.
//!
//! Positions in the active set are only meaningful for the revision they
//! were read at, because a removal moves the last record into the freed
//! slot. Every page request therefore carries the revision the reader last
//! saw, and is refused if the ledger has moved on.

use tracing::{debug, warn};

use rolebook_core::Record;
use rolebook_store::{ActiveSet, Revision, RevisionTracker};

use crate::error::{LedgerError, Result};

/// One page of active records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Index to request next. `0` means the listing is complete.
    pub next_index: usize,
    /// Records in current array order.
    pub records: Vec<Record>,
    /// Revision the page was read at.
    pub revision: Revision,
}

impl Page {
    /// Whether this page ended the listing.
    pub fn is_last(&self) -> bool {
        self.next_index == 0
    }
}

/// Read the page starting at `start`.
pub fn read_page<S: ActiveSet + ?Sized>(
    store: &S,
    revisions: &RevisionTracker,
    page_size: usize,
    start: usize,
    expected: Revision,
) -> Result<Page> {
    let current = revisions.current();
    if expected != current {
        warn!(%expected, %current, "rejected page read with stale revision");
        return Err(LedgerError::StaleRevision { expected, current });
    }

    let total = store.total_count();
    if start > total {
        return Err(LedgerError::OutOfBounds { start, total });
    }

    let len = page_size.min(total - start);
    let records = store.slice(start, len).to_vec();
    let end = start + len;
    let next_index = if end == total { 0 } else { end };

    debug!(start, len, next_index, revision = %current, "served page");
    Ok(Page {
        next_index,
        records,
        revision: current,
    })
}

/// Resumable walk over every active record.
///
/// The cursor remembers the revision it started at and the next index.
/// Between calls the ledger may be mutated; the next call then fails with
/// [`LedgerError::StaleRevision`] and the walk has to [`restart`](Self::restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    next_index: usize,
    revision: Revision,
    finished: bool,
}

impl PageCursor {
    /// Start a walk at index 0 for `revision`.
    pub fn new(revision: Revision) -> Self {
        Self {
            next_index: 0,
            revision,
            finished: false,
        }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetch the next page, or `None` once the listing has wrapped around.
    pub fn advance<S: ActiveSet + ?Sized>(
        &mut self,
        store: &S,
        revisions: &RevisionTracker,
        page_size: usize,
    ) -> Result<Option<Page>> {
        if self.finished {
            return Ok(None);
        }

        let page = read_page(store, revisions, page_size, self.next_index, self.revision)?;
        self.next_index = page.next_index;
        self.finished = page.is_last();
        Ok(Some(page))
    }

    /// Begin again from index 0 at `revision`.
    pub fn restart(&mut self, revision: Revision) {
        *self = Self::new(revision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rolebook_core::{Principal, Role, SystemId};
    use rolebook_store::MemoryStore;

    fn store_with(n: u8) -> MemoryStore {
        let mut store = MemoryStore::new();
        for i in 0..n {
            store
                .insert(Record::new(
                    SystemId::new(u64::from(i % 3)),
                    Principal::from_bytes([i; 32]),
                    Role::new(1),
                ))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_twelve_records_page_size_five() {
        let store = store_with(12);
        let revisions = RevisionTracker::starting_at(4);
        let rev = revisions.current();

        let first = read_page(&store, &revisions, 5, 0, rev).unwrap();
        assert_eq!((first.records.len(), first.next_index), (5, 5));

        let second = read_page(&store, &revisions, 5, 5, rev).unwrap();
        assert_eq!((second.records.len(), second.next_index), (5, 10));

        let third = read_page(&store, &revisions, 5, 10, rev).unwrap();
        assert_eq!((third.records.len(), third.next_index), (2, 0));
        assert!(third.is_last());
    }

    #[test]
    fn test_exact_multiple_wraps_on_last_full_page() {
        let store = store_with(10);
        let revisions = RevisionTracker::starting_at(1);
        let page = read_page(&store, &revisions, 5, 5, revisions.current()).unwrap();
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.next_index, 0);
    }

    #[test]
    fn test_start_at_total_returns_empty_wrapped_page() {
        let store = store_with(3);
        let revisions = RevisionTracker::starting_at(1);
        let page = read_page(&store, &revisions, 5, 3, revisions.current()).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.next_index, 0);
    }

    #[test]
    fn test_start_past_total_rejected() {
        let store = store_with(3);
        let revisions = RevisionTracker::starting_at(1);
        let err = read_page(&store, &revisions, 5, 4, revisions.current()).unwrap_err();
        assert!(matches!(err, LedgerError::OutOfBounds { start: 4, total: 3 }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_stale_revision_rejected_even_for_valid_index() {
        let store = store_with(3);
        let revisions = RevisionTracker::starting_at(8);
        let err = read_page(&store, &revisions, 5, 0, Revision(7)).unwrap_err();
        assert!(matches!(err, LedgerError::StaleRevision { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cursor_stops_after_wraparound() {
        let store = store_with(7);
        let revisions = RevisionTracker::starting_at(1);
        let mut cursor = PageCursor::new(revisions.current());

        let mut sizes = Vec::new();
        while let Some(page) = cursor.advance(&store, &revisions, 3).unwrap() {
            sizes.push(page.records.len());
        }
        assert_eq!(sizes, vec![3, 3, 1]);
        assert!(cursor.is_finished());
        assert!(cursor.advance(&store, &revisions, 3).unwrap().is_none());
    }

    #[test]
    fn test_cursor_fails_after_mutation_and_restarts() {
        let mut store = store_with(7);
        let mut revisions = RevisionTracker::starting_at(1);
        let mut cursor = PageCursor::new(revisions.current());

        cursor.advance(&store, &revisions, 3).unwrap();
        store
            .remove(SystemId::new(0), &Principal::from_bytes([0; 32]))
            .unwrap();
        revisions.stamp(1);

        assert!(cursor.advance(&store, &revisions, 3).is_err());

        cursor.restart(revisions.current());
        assert_eq!(cursor.next_index(), 0);
        assert!(cursor.advance(&store, &revisions, 3).unwrap().is_some());
    }

    proptest! {
        #[test]
        fn prop_walk_visits_every_record_once(n in 0u8..60, page_size in 1usize..17) {
            let store = store_with(n);
            let revisions = RevisionTracker::starting_at(1);
            let mut cursor = PageCursor::new(revisions.current());

            let mut seen = Vec::new();
            while let Some(page) = cursor.advance(&store, &revisions, page_size).unwrap() {
                prop_assert!(page.records.len() <= page_size);
                seen.extend(page.records);
            }
            prop_assert_eq!(seen.as_slice(), store.records());
        }
    }
}
