//! Proptest generators for grant/revoke sequences.

use proptest::prelude::*;

use rolebook::{Ledger, LedgerEvent, Result};
use rolebook_core::{Role, SystemId};
use rolebook_store::{ActiveSet, HeightSource};

use crate::fixtures::principal_from_seed;

/// One mutation, with principals named by seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOp {
    Grant {
        caller: u8,
        system: u64,
        target: u8,
        role: u64,
    },
    Revoke {
        caller: u8,
        system: u64,
        target: u8,
        role: u64,
    },
}

/// A single op over a small universe so that collisions are common.
///
/// Seed 0 is the deployer, so roughly one call in `principals` comes from
/// a root administrator.
pub fn op(principals: u8, systems: u64, roles: u64) -> impl Strategy<Value = LedgerOp> {
    let fields = (0..principals, 0..systems, 0..principals, 0..roles);
    prop_oneof![
        3 => fields.clone().prop_map(|(caller, system, target, role)| LedgerOp::Grant {
            caller,
            system,
            target,
            role,
        }),
        2 => fields.prop_map(|(caller, system, target, role)| LedgerOp::Revoke {
            caller,
            system,
            target,
            role,
        }),
    ]
}

/// Up to `max_len` ops over 6 principals, 4 systems, and 3 roles.
pub fn ops(max_len: usize) -> impl Strategy<Value = Vec<LedgerOp>> {
    prop::collection::vec(op(6, 4, 3), 0..=max_len)
}

/// Apply `op` to `ledger`.
pub fn apply_op<S: ActiveSet, H: HeightSource>(
    ledger: &mut Ledger<S, H>,
    op: &LedgerOp,
) -> Result<LedgerEvent> {
    match *op {
        LedgerOp::Grant {
            caller,
            system,
            target,
            role,
        } => ledger.grant(
            &principal_from_seed(caller),
            SystemId::new(system),
            principal_from_seed(target),
            Role::new(role),
        ),
        LedgerOp::Revoke {
            caller,
            system,
            target,
            role,
        } => ledger.revoke(
            &principal_from_seed(caller),
            SystemId::new(system),
            principal_from_seed(target),
            Role::new(role),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::LedgerFixture;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn prop_store_stays_consistent(ops in ops(100)) {
            let mut fx = LedgerFixture::new(3);
            for op in &ops {
                let _ = apply_op(&mut fx.ledger, op);
                prop_assert!(fx.ledger.store().check_invariants().is_ok());
            }
        }

        #[test]
        fn prop_pagination_visits_each_record_once(ops in ops(100), page_size in 1u32..8) {
            let mut fx = LedgerFixture::new(page_size);
            for op in &ops {
                let _ = apply_op(&mut fx.ledger, op);
            }

            let rev = fx.ledger.current_revision();
            let mut start = 0;
            let mut seen = HashSet::new();
            loop {
                let page = fx.ledger.page(start, rev).unwrap();
                prop_assert!(page.records.len() <= page_size as usize);
                for record in &page.records {
                    prop_assert!(seen.insert(record.key()));
                }
                if page.next_index == 0 {
                    break;
                }
                start = page.next_index;
            }
            prop_assert_eq!(seen.len(), fx.ledger.total_count());
        }

        #[test]
        fn prop_emptied_system_reports_removal(ops in ops(100)) {
            let mut fx = LedgerFixture::new(0);
            for op in &ops {
                let before = fx.ledger.member_count(SystemId::new(match op {
                    LedgerOp::Grant { system, .. } | LedgerOp::Revoke { system, .. } => *system,
                }));
                if let Ok(event) = apply_op(&mut fx.ledger, op) {
                    match event {
                        LedgerEvent::SystemRemoved(_) => prop_assert_eq!(before, 1),
                        LedgerEvent::MemberRemoved(_) => prop_assert!(before > 1),
                        LedgerEvent::SystemCreated(_) => prop_assert_eq!(before, 0),
                        LedgerEvent::MemberAdded(_) => prop_assert!(before > 0),
                    }
                }
            }
        }
    }
}
