//! Test fixtures and helpers.

use rolebook::{Ledger, LedgerConfig, LedgerEvent, Result};
use rolebook_core::{Keypair, Principal, Role, SystemId};
use rolebook_store::ManualHeight;

/// Seed byte reserved for the deploying principal.
pub const DEPLOYER_SEED: u8 = 0;

/// Deterministic keypair for a one-byte seed.
pub fn keypair_from_seed(seed: u8) -> Keypair {
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    bytes[31] = 0x5a;
    Keypair::from_seed(&bytes)
}

/// Principal of [`keypair_from_seed`].
pub fn principal_from_seed(seed: u8) -> Principal {
    keypair_from_seed(seed).principal()
}

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A deployed in-memory ledger plus the host height driving it.
pub struct LedgerFixture {
    pub ledger: Ledger,
    pub host: ManualHeight,
    pub root: Keypair,
}

impl LedgerFixture {
    /// Deploy with the given page size at height 1.
    pub fn new(page_size: u32) -> Self {
        Self::with_config(LedgerConfig::with_page_size(page_size))
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let root = keypair_from_seed(DEPLOYER_SEED);
        let host = ManualHeight::new(1);
        let ledger = Ledger::new(root.principal(), config, host.clone())
            .expect("deploying into an empty store cannot fail");
        Self { ledger, host, root }
    }

    pub fn root_principal(&self) -> Principal {
        self.root.principal()
    }

    pub fn principal(&self, seed: u8) -> Principal {
        principal_from_seed(seed)
    }

    pub fn keypair(&self, seed: u8) -> Keypair {
        keypair_from_seed(seed)
    }

    /// Create `system` with `admin` as its first administrator, as root.
    pub fn create_system(&mut self, system: SystemId, admin: Principal) -> Result<LedgerEvent> {
        let root = self.root_principal();
        self.ledger.grant(&root, system, admin, Role::ADMIN)
    }

    /// Add `members` to `system` with `role`, granted by `admin`.
    pub fn add_members(
        &mut self,
        admin: &Principal,
        system: SystemId,
        members: &[Principal],
        role: Role,
    ) -> Result<()> {
        for member in members {
            self.ledger.grant(admin, system, *member, role)?;
        }
        Ok(())
    }

    /// Advance the host by one block.
    pub fn next_block(&self) -> u64 {
        self.host.advance(1)
    }
}

impl Default for LedgerFixture {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Build a principal from a hex string, for scenarios written by hand.
pub fn principal_from_hex(s: &str) -> Option<Principal> {
    let bytes = hex::decode(s).ok()?;
    Principal::try_from(bytes.as_slice()).ok()
}

/// A random principal with no keypair kept.
pub fn random_principal() -> Principal {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Principal::from_bytes(bytes)
}
