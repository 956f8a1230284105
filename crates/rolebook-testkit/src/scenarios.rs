//! Named, scripted scenarios with expected outcomes.
//!
//! Each scenario deploys a fresh ledger (deployer = seed 0) and runs its
//! steps in order. Principals are named by seed, see
//! [`principal_from_seed`](crate::fixtures::principal_from_seed).

use rolebook::{FailureClass, LedgerConfig, LedgerEvent, Revision};

use crate::fixtures::LedgerFixture;
use crate::generators::{apply_op, LedgerOp};

/// Expected outcome of a mutation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    SystemCreated,
    MemberAdded,
    SystemRemoved,
    MemberRemoved,
    Unauthorized,
    NotFound,
}

impl Expect {
    fn matches_event(self, event: &LedgerEvent) -> bool {
        matches!(
            (self, event),
            (Expect::SystemCreated, LedgerEvent::SystemCreated(_))
                | (Expect::MemberAdded, LedgerEvent::MemberAdded(_))
                | (Expect::SystemRemoved, LedgerEvent::SystemRemoved(_))
                | (Expect::MemberRemoved, LedgerEvent::MemberRemoved(_))
        )
    }

    fn matches_class(self, class: Option<FailureClass>) -> bool {
        matches!(
            (self, class),
            (Expect::Unauthorized, Some(FailureClass::Unauthorized))
                | (Expect::NotFound, Some(FailureClass::NotFound))
        )
    }
}

/// One step of a scenario.
#[derive(Debug, Clone)]
pub enum Step {
    /// Apply a mutation and check its outcome.
    Mutate(LedgerOp, Expect),
    /// Read a page at the current revision.
    Page {
        start: usize,
        len: usize,
        next_index: usize,
    },
    /// Read a page at a revision one behind the current one.
    StalePage { start: usize },
    /// Advance the host height.
    Blocks(u64),
}

/// A named scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub page_size: u32,
    pub steps: Vec<Step>,
}

fn grant(caller: u8, system: u64, target: u8, role: u64, expect: Expect) -> Step {
    Step::Mutate(
        LedgerOp::Grant {
            caller,
            system,
            target,
            role,
        },
        expect,
    )
}

fn revoke(caller: u8, system: u64, target: u8, role: u64, expect: Expect) -> Step {
    Step::Mutate(
        LedgerOp::Revoke {
            caller,
            system,
            target,
            role,
        },
        expect,
    )
}

/// Every built-in scenario.
pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        twelve_records_in_pages_of_five(),
        bootstrap_gating(),
        admin_grants_admin(),
        revoke_requires_exact_role(),
        system_boundary(),
        outsider_denied(),
    ]
}

fn twelve_records_in_pages_of_five() -> Scenario {
    let mut steps = vec![
        grant(0, 1, 1, 0, Expect::SystemCreated),
        grant(0, 2, 2, 0, Expect::SystemCreated),
    ];
    steps.extend((10..13).map(|n| grant(0, 0, n, 1, Expect::MemberAdded)));
    steps.extend((20..24).map(|n| grant(1, 1, n, 2, Expect::MemberAdded)));
    steps.extend((30..32).map(|n| grant(2, 2, n, 3, Expect::MemberAdded)));
    steps.extend([
        Step::Page {
            start: 0,
            len: 5,
            next_index: 5,
        },
        Step::Page {
            start: 5,
            len: 5,
            next_index: 10,
        },
        Step::Page {
            start: 10,
            len: 2,
            next_index: 0,
        },
        Step::StalePage { start: 0 },
    ]);

    Scenario {
        name: "twelve records across three systems, page size five",
        page_size: 5,
        steps,
    }
}

fn bootstrap_gating() -> Scenario {
    Scenario {
        name: "only root administrators create systems, and only with role 0",
        page_size: 0,
        steps: vec![
            grant(0, 0, 1, 3, Expect::MemberAdded),
            grant(1, 7, 2, 0, Expect::Unauthorized),
            grant(0, 7, 2, 4, Expect::NotFound),
            grant(0, 7, 2, 0, Expect::SystemCreated),
            grant(2, 8, 3, 0, Expect::Unauthorized),
        ],
    }
}

fn admin_grants_admin() -> Scenario {
    Scenario {
        name: "members add members, only administrators add administrators",
        page_size: 0,
        steps: vec![
            grant(0, 4, 1, 0, Expect::SystemCreated),
            grant(1, 4, 2, 5, Expect::MemberAdded),
            grant(2, 4, 3, 6, Expect::MemberAdded),
            grant(2, 4, 4, 0, Expect::Unauthorized),
            grant(1, 4, 4, 0, Expect::MemberAdded),
            grant(1, 4, 3, 6, Expect::Unauthorized),
        ],
    }
}

fn revoke_requires_exact_role() -> Scenario {
    Scenario {
        name: "revoke must name the stored role",
        page_size: 0,
        steps: vec![
            grant(0, 4, 1, 0, Expect::SystemCreated),
            grant(1, 4, 2, 5, Expect::MemberAdded),
            revoke(1, 4, 2, 6, Expect::NotFound),
            revoke(1, 4, 9, 5, Expect::NotFound),
            revoke(2, 4, 1, 0, Expect::Unauthorized),
            revoke(2, 4, 2, 5, Expect::MemberRemoved),
        ],
    }
}

fn system_boundary() -> Scenario {
    Scenario {
        name: "emptying a system removes it and frees its id",
        page_size: 2,
        steps: vec![
            grant(0, 3, 1, 0, Expect::SystemCreated),
            grant(1, 3, 2, 1, Expect::MemberAdded),
            Step::Blocks(4),
            revoke(1, 3, 2, 1, Expect::MemberRemoved),
            revoke(1, 3, 1, 0, Expect::SystemRemoved),
            grant(1, 3, 2, 1, Expect::Unauthorized),
            grant(0, 3, 5, 0, Expect::SystemCreated),
            Step::Page {
                start: 0,
                len: 2,
                next_index: 0,
            },
            Step::Page {
                start: 2,
                len: 0,
                next_index: 0,
            },
        ],
    }
}

fn outsider_denied() -> Scenario {
    let mut steps = vec![
        grant(0, 1, 1, 0, Expect::SystemCreated),
        grant(1, 1, 2, 4, Expect::MemberAdded),
    ];
    for system in [0, 1, 9] {
        for role in [0, 4] {
            steps.push(grant(99, system, 50, role, Expect::Unauthorized));
            steps.push(revoke(99, system, 2, role, Expect::Unauthorized));
            steps.push(revoke(99, system, 1, role, Expect::Unauthorized));
        }
    }
    Scenario {
        name: "a principal with no records is refused everything",
        page_size: 0,
        steps,
    }
}

/// Run `scenario`, returning a description of the first mismatch.
pub fn run_scenario(scenario: &Scenario) -> Result<(), String> {
    let mut fx = LedgerFixture::with_config(LedgerConfig::with_page_size(scenario.page_size));

    for (i, step) in scenario.steps.iter().enumerate() {
        let fail = |msg: String| format!("{}: step {i}: {msg}", scenario.name);

        match step {
            Step::Mutate(op, expect) => {
                let before = fx.ledger.current_revision();
                match apply_op(&mut fx.ledger, op) {
                    Ok(event) if expect.matches_event(&event) => {}
                    Ok(event) => return Err(fail(format!("expected {expect:?}, got {event:?}"))),
                    Err(e) if expect.matches_class(e.class()) => {
                        if fx.ledger.current_revision() != before {
                            return Err(fail("rejected call moved the revision".into()));
                        }
                    }
                    Err(e) => return Err(fail(format!("expected {expect:?}, got error {e}"))),
                }
            }
            Step::Page {
                start,
                len,
                next_index,
            } => {
                let page = fx
                    .ledger
                    .page(*start, fx.ledger.current_revision())
                    .map_err(|e| fail(format!("page failed: {e}")))?;
                if page.records.len() != *len || page.next_index != *next_index {
                    return Err(fail(format!(
                        "expected {len} records and next {next_index}, got {} and {}",
                        page.records.len(),
                        page.next_index
                    )));
                }
            }
            Step::StalePage { start } => {
                let stale = Revision(fx.ledger.current_revision().get().saturating_sub(1));
                if fx.ledger.page(*start, stale).is_ok() {
                    return Err(fail("stale page read was served".into()));
                }
            }
            Step::Blocks(n) => {
                fx.host.advance(*n);
            }
        }
    }

    Ok(())
}
