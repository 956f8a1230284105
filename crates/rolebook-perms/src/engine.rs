//! Grant and revoke authorization.
//!
//! The caller's standing is checked before the target is looked up, so a
//! principal with no standing in a system always sees `Unauthorized` and
//! learns nothing about which records exist there.

use rolebook_core::{Principal, Record, SystemId};
use rolebook_store::ActiveSet;

use crate::error::{PermsError, Result};
use crate::outcome::GrantKind;
use crate::policy::RevokePolicy;

/// Decides grant and revoke requests against an [`ActiveSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    policy: RevokePolicy,
}

impl Engine {
    pub fn new(policy: RevokePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RevokePolicy {
        &self.policy
    }

    /// Decide whether `caller` may grant `record`.
    pub fn authorize_grant<S: ActiveSet + ?Sized>(
        &self,
        store: &S,
        caller: &Principal,
        record: &Record,
    ) -> Result<GrantKind> {
        if store.count_for(record.system) == 0 {
            return self.authorize_bootstrap(store, caller, record);
        }

        let caller_role = store.role_of(record.system, caller).ok_or_else(|| {
            PermsError::Unauthorized(format!(
                "caller {caller} is not a member of system {}",
                record.system
            ))
        })?;

        if store.exists(record.system, &record.principal) {
            return Err(PermsError::Unauthorized(format!(
                "principal {} already holds a role in system {}",
                record.principal, record.system
            )));
        }

        if record.is_admin() && !caller_role.is_admin() {
            return Err(PermsError::Unauthorized(format!(
                "only administrators of system {} may grant the administrator role",
                record.system
            )));
        }

        Ok(GrantKind::MemberAddition)
    }

    /// A grant into a system with no members brings that system into existence.
    fn authorize_bootstrap<S: ActiveSet + ?Sized>(
        &self,
        store: &S,
        caller: &Principal,
        record: &Record,
    ) -> Result<GrantKind> {
        let is_root_admin = store
            .role_of(SystemId::ROOT, caller)
            .is_some_and(|role| role.is_admin());
        if !is_root_admin {
            return Err(PermsError::Unauthorized(format!(
                "caller {caller} is not a root administrator and cannot create system {}",
                record.system
            )));
        }

        if !record.is_admin() {
            return Err(PermsError::NotFound(format!(
                "system {} does not exist; its first grant must be an administrator",
                record.system
            )));
        }

        Ok(GrantKind::SystemCreation)
    }

    /// Decide whether `caller` may revoke `record`.
    ///
    /// `record.role` must equal the stored role; a mismatch is reported as
    /// not found.
    pub fn authorize_revoke<S: ActiveSet + ?Sized>(
        &self,
        store: &S,
        caller: &Principal,
        record: &Record,
    ) -> Result<()> {
        let caller_role = store.role_of(record.system, caller).ok_or_else(|| {
            PermsError::Unauthorized(format!(
                "caller {caller} is not a member of system {}",
                record.system
            ))
        })?;

        let exact = store
            .find(&record.key())
            .is_some_and(|stored| stored.matches(record.system, &record.principal, record.role));
        if !exact {
            return Err(PermsError::NotFound(format!("no active record {record}")));
        }

        if record.is_admin() && !caller_role.is_admin() {
            return Err(PermsError::Unauthorized(format!(
                "only administrators of system {} may revoke an administrator",
                record.system
            )));
        }

        if self.policy.protect_last_root_admin
            && record.system.is_root()
            && record.is_admin()
            && store.admins_for(SystemId::ROOT) <= 1
        {
            return Err(PermsError::Unauthorized(
                "refusing to revoke the last root administrator".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureClass;
    use proptest::prelude::*;
    use rolebook_core::Role;
    use rolebook_store::MemoryStore;

    fn p(n: u8) -> Principal {
        Principal::from_bytes([n; 32])
    }

    fn rec(system: u64, principal: u8, role: u64) -> Record {
        Record::new(SystemId::new(system), p(principal), Role::new(role))
    }

    /// Root admin 1; system 5 with admin 2 and member 3 (role 7).
    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(rec(0, 1, 0)).unwrap();
        store.insert(rec(5, 2, 0)).unwrap();
        store.insert(rec(5, 3, 7)).unwrap();
        store
    }

    fn class<T: std::fmt::Debug>(result: Result<T>) -> FailureClass {
        result.unwrap_err().class()
    }

    #[test]
    fn test_root_admin_creates_system() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            engine.authorize_grant(&store, &p(1), &rec(9, 4, 0)).unwrap(),
            GrantKind::SystemCreation
        );
    }

    #[test]
    fn test_bootstrap_requires_admin_role() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            class(engine.authorize_grant(&store, &p(1), &rec(9, 4, 3))),
            FailureClass::NotFound
        );
    }

    #[test]
    fn test_bootstrap_requires_root_admin() {
        let store = seeded();
        let engine = Engine::default();
        // Admin of system 5 but not of root.
        assert_eq!(
            class(engine.authorize_grant(&store, &p(2), &rec(9, 4, 0))),
            FailureClass::Unauthorized
        );
    }

    #[test]
    fn test_root_member_without_admin_cannot_bootstrap() {
        let mut store = seeded();
        store.insert(rec(0, 6, 2)).unwrap();
        let engine = Engine::default();
        assert_eq!(
            class(engine.authorize_grant(&store, &p(6), &rec(9, 4, 0))),
            FailureClass::Unauthorized
        );
    }

    #[test]
    fn test_member_adds_member() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            engine.authorize_grant(&store, &p(3), &rec(5, 4, 9)).unwrap(),
            GrantKind::MemberAddition
        );
    }

    #[test]
    fn test_member_cannot_add_admin() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            class(engine.authorize_grant(&store, &p(3), &rec(5, 4, 0))),
            FailureClass::Unauthorized
        );
        assert!(engine.authorize_grant(&store, &p(2), &rec(5, 4, 0)).is_ok());
    }

    #[test]
    fn test_duplicate_grant_rejected_even_with_same_role() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            class(engine.authorize_grant(&store, &p(2), &rec(5, 3, 7))),
            FailureClass::Unauthorized
        );
        assert_eq!(
            class(engine.authorize_grant(&store, &p(2), &rec(5, 3, 1))),
            FailureClass::Unauthorized
        );
    }

    #[test]
    fn test_root_admin_has_no_standing_in_other_systems() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            class(engine.authorize_grant(&store, &p(1), &rec(5, 4, 9))),
            FailureClass::Unauthorized
        );
    }

    #[test]
    fn test_revoke_requires_exact_role() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            class(engine.authorize_revoke(&store, &p(2), &rec(5, 3, 6))),
            FailureClass::NotFound
        );
        assert!(engine.authorize_revoke(&store, &p(2), &rec(5, 3, 7)).is_ok());
    }

    #[test]
    fn test_member_may_revoke_member() {
        let mut store = seeded();
        store.insert(rec(5, 4, 1)).unwrap();
        let engine = Engine::default();
        assert!(engine.authorize_revoke(&store, &p(3), &rec(5, 4, 1)).is_ok());
    }

    #[test]
    fn test_member_cannot_revoke_admin() {
        let store = seeded();
        let engine = Engine::default();
        assert_eq!(
            class(engine.authorize_revoke(&store, &p(3), &rec(5, 2, 0))),
            FailureClass::Unauthorized
        );
    }

    #[test]
    fn test_admin_may_revoke_self() {
        let store = seeded();
        let engine = Engine::default();
        assert!(engine.authorize_revoke(&store, &p(2), &rec(5, 2, 0)).is_ok());
    }

    #[test]
    fn test_last_root_admin_protected_by_default() {
        let store = seeded();
        assert_eq!(
            class(Engine::default().authorize_revoke(&store, &p(1), &rec(0, 1, 0))),
            FailureClass::Unauthorized
        );
        assert!(Engine::new(RevokePolicy::permissive())
            .authorize_revoke(&store, &p(1), &rec(0, 1, 0))
            .is_ok());
    }

    #[test]
    fn test_second_root_admin_can_be_revoked() {
        let mut store = seeded();
        store.insert(rec(0, 8, 0)).unwrap();
        let engine = Engine::default();
        assert!(engine.authorize_revoke(&store, &p(1), &rec(0, 8, 0)).is_ok());
        assert!(engine.authorize_revoke(&store, &p(8), &rec(0, 1, 0)).is_ok());
    }

    #[test]
    fn test_outsider_is_unauthorized_everywhere() {
        let store = seeded();
        let engine = Engine::default();
        let outsider = p(99);
        for target in [rec(0, 4, 0), rec(5, 4, 2), rec(5, 3, 7), rec(6, 4, 0), rec(6, 4, 1)] {
            assert_eq!(
                class(engine.authorize_grant(&store, &outsider, &target)),
                FailureClass::Unauthorized
            );
            assert_eq!(
                class(engine.authorize_revoke(&store, &outsider, &target)),
                FailureClass::Unauthorized
            );
        }
    }

    proptest! {
        #[test]
        fn prop_grant_to_missing_system_needs_root_admin_and_role_zero(
            caller in 0u8..6,
            role in 0u64..3,
            caller_root_role in proptest::option::of(0u64..3),
        ) {
            let mut store = MemoryStore::new();
            store.insert(rec(0, 50, 0)).unwrap();
            if let Some(r) = caller_root_role {
                store.insert(rec(0, caller, r)).unwrap();
            }
            let ok = Engine::default()
                .authorize_grant(&store, &p(caller), &rec(3, 60, role))
                .is_ok();
            prop_assert_eq!(ok, role == 0 && caller_root_role == Some(0));
        }

        #[test]
        fn prop_grant_to_existing_system_gated_by_caller_role(
            caller_role in proptest::option::of(0u64..3),
            role in 0u64..3,
        ) {
            let mut store = MemoryStore::new();
            store.insert(rec(0, 50, 0)).unwrap();
            store.insert(rec(3, 51, 0)).unwrap();
            if let Some(r) = caller_role {
                store.insert(rec(3, 10, r)).unwrap();
            }
            let ok = Engine::default()
                .authorize_grant(&store, &p(10), &rec(3, 60, role))
                .is_ok();
            let expected = match caller_role {
                None => false,
                Some(r) => role != 0 || r == 0,
            };
            prop_assert_eq!(ok, expected);
        }
    }
}
