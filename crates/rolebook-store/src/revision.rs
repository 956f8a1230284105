//! Revision marker stamped on every accepted mutation.
//!
//! Readers present the marker they last saw; any mismatch means the active
//! array may have been reordered since, and the read is refused.
//!
//! The marker tracks the host block height but is not the block height:
//! each stamp is `max(height, current + 1)`, so it stays strictly increasing
//! when several mutations share a block.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A revision marker.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Revision({})", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Revision {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

/// Source of the host ledger's current block height.
///
/// The height is an input to [`RevisionTracker::stamp`], not the marker
/// itself: a revision is never below the height it was stamped at, but it
/// runs ahead of the host once two mutations land in the same block.
pub trait HeightSource {
    fn current_height(&self) -> u64;
}

impl<H: HeightSource + ?Sized> HeightSource for Arc<H> {
    fn current_height(&self) -> u64 {
        (**self).current_height()
    }
}

impl<H: HeightSource + ?Sized> HeightSource for &H {
    fn current_height(&self) -> u64 {
        (**self).current_height()
    }
}

/// A height the embedding host sets explicitly.
///
/// Setting it does not move the ledger's revision; only mutations do.
///
/// Clones share the same counter, so a host can keep one handle and give
/// another to the ledger.
#[derive(Debug, Clone, Default)]
pub struct ManualHeight {
    height: Arc<AtomicU64>,
}

impl ManualHeight {
    pub fn new(height: u64) -> Self {
        Self {
            height: Arc::new(AtomicU64::new(height)),
        }
    }

    pub fn set(&self, height: u64) {
        self.height.store(height, Ordering::SeqCst);
    }

    /// Advance by `blocks`, saturating at `u64::MAX`, and return the new height.
    pub fn advance(&self, blocks: u64) -> u64 {
        let previous = self
            .height
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |h| {
                Some(h.saturating_add(blocks))
            })
            .unwrap_or_else(|h| h);
        previous.saturating_add(blocks)
    }
}

impl HeightSource for ManualHeight {
    fn current_height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }
}

/// Holds the current revision marker.
#[derive(Debug, Clone, Default)]
pub struct RevisionTracker {
    current: Revision,
}

impl RevisionTracker {
    /// Start at the deployment height.
    pub fn starting_at(height: u64) -> Self {
        Self {
            current: Revision(height),
        }
    }

    pub fn current(&self) -> Revision {
        self.current
    }

    pub fn is_current(&self, expected: Revision) -> bool {
        self.current == expected
    }

    /// Stamp a mutation observed at `height`.
    ///
    /// The marker becomes `height` when the host has moved past the current
    /// marker, and `current + 1` otherwise. Two mutations in the same block
    /// therefore still produce distinct markers.
    pub fn stamp(&mut self, height: u64) -> Revision {
        let next = height.max(self.current.0.saturating_add(1));
        self.current = Revision(next);
        self.current
    }
}
