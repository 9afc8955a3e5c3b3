//! Identity provider boundary.
//!
//! The core never owns principals; it asks a [`PrincipalProvider`] for the
//! current roster whenever a principal-valued type is resolved.

use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Opaque principal identifier supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub u64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user known to the host (e.g., a connected player).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub display_name: String,
}

impl Principal {
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id: PrincipalId(id),
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// Supplies the current list of principals.
pub trait PrincipalProvider: Send + Sync {
    /// Snapshot of the current roster, in host order.
    fn list_principals(&self) -> Vec<Principal>;

    /// Case-insensitive display name lookup.
    fn find_by_name(&self, name: &str) -> Option<Principal> {
        self.list_principals()
            .into_iter()
            .find(|p| p.display_name.eq_ignore_ascii_case(name))
    }
}

/// In-memory roster. Principals may join and leave at runtime.
#[derive(Debug, Default)]
pub struct StaticPrincipals {
    roster: RwLock<Vec<Principal>>,
}

impl StaticPrincipals {
    pub fn new(principals: Vec<Principal>) -> Self {
        Self {
            roster: RwLock::new(principals),
        }
    }

    /// Add a principal, replacing any existing entry with the same id.
    pub fn join(&self, principal: Principal) {
        let mut roster = self.roster.write();
        roster.retain(|p| p.id != principal.id);
        roster.push(principal);
    }

    /// Remove a principal by id.
    pub fn leave(&self, id: PrincipalId) -> Option<Principal> {
        let mut roster = self.roster.write();
        let index = roster.iter().position(|p| p.id == id)?;
        Some(roster.remove(index))
    }

    pub fn len(&self) -> usize {
        self.roster.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.read().is_empty()
    }
}

impl PrincipalProvider for StaticPrincipals {
    fn list_principals(&self) -> Vec<Principal> {
        self.roster.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_name_ignores_case() {
        let roster = StaticPrincipals::new(vec![Principal::new(1, "Alice")]);
        assert_eq!(roster.find_by_name("aLiCe").map(|p| p.id), Some(PrincipalId(1)));
        assert!(roster.find_by_name("Bob").is_none());
    }

    #[test]
    fn join_replaces_same_id() {
        let roster = StaticPrincipals::new(vec![Principal::new(1, "Alice")]);
        roster.join(Principal::new(1, "Alicia"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.list_principals()[0].display_name, "Alicia");
    }

    #[test]
    fn leave_removes_principal() {
        let roster = StaticPrincipals::new(vec![Principal::new(1, "Alice"), Principal::new(2, "Bob")]);
        assert_eq!(roster.leave(PrincipalId(1)).map(|p| p.display_name), Some("Alice".to_string()));
        assert!(roster.leave(PrincipalId(1)).is_none());
        assert_eq!(roster.len(), 1);
    }
}
