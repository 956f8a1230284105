//! The Ledger: unified API for Rolebook.
//!
//! The Ledger owns the active set, the permission engine, and the revision
//! tracker. Mutations take `&mut self`, so grants and revokes are applied
//! one at a time, each either fully or not at all.

use tracing::{debug, info, warn};

use rolebook_core::{CallKind, Principal, Record, Role, SignedCall, SystemId};
use rolebook_perms::{Engine, RevokeKind};
use rolebook_store::{
    ActiveSet, HeightSource, ManualHeight, MemoryStore, Revision, RevisionTracker,
};

use crate::config::LedgerConfig;
use crate::error::Result;
use crate::events::LedgerEvent;
use crate::reader::{self, Page, PageCursor};

/// Access-control ledger.
///
/// Generic over the active-set storage and over where block heights come
/// from, with in-memory storage and a host-set height by default.
pub struct Ledger<S: ActiveSet = MemoryStore, H: HeightSource = ManualHeight> {
    /// Active records.
    store: S,
    /// Authorization rules.
    engine: Engine,
    /// Freshness marker for readers.
    revisions: RevisionTracker,
    /// Host block height.
    heights: H,
    /// Effective page size.
    page_size: usize,
    /// Principal that deployed the ledger.
    deployer: Principal,
}

impl<H: HeightSource> Ledger<MemoryStore, H> {
    /// Deploy a ledger with in-memory storage.
    ///
    /// `deployer` becomes the first administrator of the root system.
    pub fn new(deployer: Principal, config: LedgerConfig, heights: H) -> Result<Self> {
        Self::with_store(MemoryStore::new(), deployer, config, heights)
    }
}

impl<S: ActiveSet, H: HeightSource> Ledger<S, H> {
    /// Deploy a ledger over the given store.
    pub fn with_store(
        mut store: S,
        deployer: Principal,
        config: LedgerConfig,
        heights: H,
    ) -> Result<Self> {
        let root = Record::admin(SystemId::ROOT, deployer);
        store.insert(root)?;

        let revisions = RevisionTracker::starting_at(heights.current_height());
        let page_size = config.effective_page_size() as usize;

        info!(
            deployer = %deployer,
            page_size,
            revision = %revisions.current(),
            "ledger deployed"
        );

        Ok(Self {
            store,
            engine: Engine::new(config.revoke_policy),
            revisions,
            heights,
            page_size,
            deployer,
        })
    }

    pub fn deployer(&self) -> &Principal {
        &self.deployer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant `role` in `system` to `principal`, on behalf of `caller`.
    pub fn grant(
        &mut self,
        caller: &Principal,
        system: SystemId,
        principal: Principal,
        role: Role,
    ) -> Result<LedgerEvent> {
        let record = Record::new(system, principal, role);

        let kind = self
            .engine
            .authorize_grant(&self.store, caller, &record)
            .map_err(|e| {
                warn!(caller = %caller, %system, %principal, %role, error = %e, "grant rejected");
                e
            })?;

        self.store.insert(record)?;
        Ok(self.commit(LedgerEvent::granted(kind, record)))
    }

    /// Revoke the record `(system, principal, role)`, on behalf of `caller`.
    ///
    /// `role` must be the record's current role.
    pub fn revoke(
        &mut self,
        caller: &Principal,
        system: SystemId,
        principal: Principal,
        role: Role,
    ) -> Result<LedgerEvent> {
        let record = Record::new(system, principal, role);

        self.engine
            .authorize_revoke(&self.store, caller, &record)
            .map_err(|e| {
                warn!(caller = %caller, %system, %principal, %role, error = %e, "revoke rejected");
                e
            })?;

        let removal = self.store.remove(system, &principal)?;
        let kind = RevokeKind::from_remaining(removal.remaining_in_system);
        Ok(self.commit(LedgerEvent::revoked(kind, removal.removed)))
    }

    /// Verify a signed call and apply it with the signer as caller.
    pub fn submit(&mut self, signed: &SignedCall) -> Result<LedgerEvent> {
        let id = signed.id();
        signed.verify().map_err(|e| {
            warn!(call = %id, caller = %signed.caller, error = %e, "signed call rejected");
            e
        })?;
        debug!(
            call = %id,
            caller = %signed.caller,
            kind = ?signed.call.kind,
            "signed call accepted"
        );

        let record = signed.call.record;
        match signed.call.kind {
            CallKind::Grant => {
                self.grant(&signed.caller, record.system, record.principal, record.role)
            }
            CallKind::Revoke => {
                self.revoke(&signed.caller, record.system, record.principal, record.role)
            }
        }
    }

    /// Decode a signed call from its wire encoding and submit it.
    pub fn submit_bytes(&mut self, bytes: &[u8]) -> Result<LedgerEvent> {
        let signed = SignedCall::from_canonical_bytes(bytes).map_err(|e| {
            warn!(len = bytes.len(), error = %e, "malformed signed call");
            e
        })?;
        self.submit(&signed)
    }

    /// Stamp a new revision and log the event.
    fn commit(&mut self, event: LedgerEvent) -> LedgerEvent {
        let revision = self.revisions.stamp(self.heights.current_height());
        let record = event.record();

        if event.is_system_boundary() {
            info!(
                event = event.name(),
                system = %record.system,
                principal = %record.principal,
                role = %record.role,
                %revision,
                "system boundary"
            );
        } else {
            debug!(
                event = event.name(),
                system = %record.system,
                principal = %record.principal,
                role = %record.role,
                %revision,
                "membership changed"
            );
        }

        event
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    pub fn role_of(&self, system: SystemId, principal: &Principal) -> Option<Role> {
        self.store.role_of(system, principal)
    }

    pub fn exists(&self, system: SystemId, principal: &Principal) -> bool {
        self.store.exists(system, principal)
    }

    /// Whether `system` currently has any members.
    pub fn system_exists(&self, system: SystemId) -> bool {
        self.store.count_for(system) > 0
    }

    pub fn member_count(&self, system: SystemId) -> u64 {
        self.store.count_for(system)
    }

    pub fn total_count(&self) -> usize {
        self.store.total_count()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_revision(&self) -> Revision {
        self.revisions.current()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the page starting at `start`, valid only at `expected`.
    pub fn page(&self, start: usize, expected: Revision) -> Result<Page> {
        reader::read_page(&self.store, &self.revisions, self.page_size, start, expected)
    }

    /// A cursor positioned at the start of the listing, at the current revision.
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.revisions.current())
    }

    /// Fetch the next page for `cursor`.
    pub fn next_page(&self, cursor: &mut PageCursor) -> Result<Option<Page>> {
        cursor.advance(&self.store, &self.revisions, self.page_size)
    }

    /// Collect every active record by walking pages at the current revision.
    pub fn collect_all(&self) -> Result<Vec<Record>> {
        let mut cursor = self.cursor();
        let mut records = Vec::with_capacity(self.total_count());
        while let Some(page) = self.next_page(&mut cursor)? {
            records.extend(page.records);
        }
        Ok(records)
    }
}

impl<S: ActiveSet + std::fmt::Debug, H: HeightSource> std::fmt::Debug for Ledger<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("deployer", &self.deployer)
            .field("revision", &self.revisions.current())
            .field("page_size", &self.page_size)
            .field("store", &self.store)
            .finish()
    }
}
