//! # Rolebook Testkit
//!
//! Testing utilities for Rolebook.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a deployed ledger with deterministic principals and a
//!   host height handle
//! - **Generators**: proptest strategies for grant/revoke sequences
//! - **Scenarios**: named, scripted call sequences with expected outcomes
//!
//! ## Scenarios
//!
//! ```rust
//! use rolebook_testkit::scenarios::{all_scenarios, run_scenario};
//!
//! for scenario in all_scenarios() {
//!     run_scenario(&scenario).unwrap();
//! }
//! ```
//!
//! ## Fixtures
//!
//! ```rust
//! use rolebook::core::{Role, SystemId};
//! use rolebook_testkit::LedgerFixture;
//!
//! let mut fx = LedgerFixture::new(5);
//! let alice = fx.principal(1);
//! fx.create_system(SystemId::new(3), alice).unwrap();
//! assert_eq!(fx.ledger.role_of(SystemId::new(3), &alice), Some(Role::ADMIN));
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenarios;

pub use fixtures::{init_tracing, principal_from_seed, LedgerFixture};
pub use generators::{apply_op, op, ops, LedgerOp};
pub use scenarios::{all_scenarios, run_scenario, Expect, Scenario, Step};
