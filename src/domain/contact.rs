//! Contacts, contact groups and ACL groups as seen by the rule engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Topology role granting read access to resource access rule management.
pub const ROLE_RESOURCE_ACCESS_READ: &str = "ROLE_ADMINISTRATION_ACL_RESOURCE_ACCESS_MANAGEMENT_R";

/// Topology role granting read/write access to resource access rule management.
pub const ROLE_RESOURCE_ACCESS_WRITE: &str =
    "ROLE_ADMINISTRATION_ACL_RESOURCE_ACCESS_MANAGEMENT_RW";

/// The authenticated contact on whose behalf an operation runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub topology_roles: BTreeSet<String>,
}

impl Contact {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn admin(id: i64, name: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(id, name)
        }
    }

    pub fn with_topology_role(mut self, role: impl Into<String>) -> Self {
        self.topology_roles.insert(role.into());
        self
    }

    pub fn has_topology_role(&self, role: &str) -> bool {
        self.topology_roles.contains(role)
    }

    pub fn has_any_topology_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_topology_role(role))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactGroup {
    pub id: i64,
    pub name: String,
}

/// ACL group; used to authorize the caller, not to compute rule bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGroup {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_roles() {
        let contact = Contact::new(3, "operator").with_topology_role(ROLE_RESOURCE_ACCESS_READ);
        assert!(contact.has_topology_role(ROLE_RESOURCE_ACCESS_READ));
        assert!(!contact.has_topology_role(ROLE_RESOURCE_ACCESS_WRITE));
        assert!(contact.has_any_topology_role(&[
            ROLE_RESOURCE_ACCESS_READ,
            ROLE_RESOURCE_ACCESS_WRITE
        ]));
        assert!(!contact.is_admin);
    }

    #[test]
    fn test_admin_constructor() {
        let admin = Contact::admin(1, "admin");
        assert!(admin.is_admin);
        assert!(admin.topology_roles.is_empty());
    }
}
