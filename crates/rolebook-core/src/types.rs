//! Strong type definitions for system ids and roles.
//!
//! Both are plain integers on the wire; the newtypes keep a role from being
//! passed where a system id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a system (a partition of the registry).
///
/// A system is not stored on its own: it exists while at least one active
/// record names it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub u64);

impl SystemId {
    /// The root system. Its administrators may bootstrap new systems.
    pub const ROOT: Self = Self(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemId({})", self.0)
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SystemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Role held by a principal inside a system.
///
/// `0` is the administrator role. Every other value is an ordinary member
/// tier whose meaning belongs to the application.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub u64);

impl Role {
    /// The administrator role.
    pub const ADMIN: Self = Self(0);

    pub const fn new(role: u64) -> Self {
        Self(role)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_admin(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_admin() {
            write!(f, "Role(admin)")
        } else {
            write!(f, "Role({})", self.0)
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Role {
    fn from(role: u64) -> Self {
        Self(role)
    }
}
