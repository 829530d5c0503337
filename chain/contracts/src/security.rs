//! Access control for game administration
//!
//! The owner opens rounds and may grade them; graders may only grade.
//! The contributor address is recorded for attribution and holds no
//! administrative power.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::Address;

/// Administrative roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full game control
    Owner,
    /// May submit round roots
    Grader,
    /// Credited contributor, no privileges
    Contributor,
}

/// Role-based access control keyed by address.
#[derive(Debug, Clone)]
pub struct AccessControl {
    roles: HashMap<Address, Role>,
    owner: Address,
}

impl AccessControl {
    /// Create access control with an initial owner.
    pub fn new(owner: Address) -> Self {
        let mut roles = HashMap::new();
        roles.insert(owner, Role::Owner);
        Self { roles, owner }
    }

    /// Check if a caller has the specified role.
    pub fn has_role(&self, caller: &Address, role: Role) -> bool {
        self.roles.get(caller).map_or(false, |r| *r == role)
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        self.has_role(caller, Role::Owner)
    }

    /// Owner or grader.
    pub fn can_grade(&self, caller: &Address) -> bool {
        self.is_owner(caller) || self.has_role(caller, Role::Grader)
    }

    /// Assign a role. Only the owner can assign, and ownership is fixed at
    /// construction.
    pub fn grant_role(&mut self, caller: &Address, target: Address, role: Role) -> bool {
        if !self.is_owner(caller) || role == Role::Owner || target == self.owner {
            return false;
        }
        self.roles.insert(target, role);
        true
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::from_low_byte(1)
    }

    fn bob() -> Address {
        Address::from_low_byte(2)
    }

    #[test]
    fn test_owner_can_grade() {
        let ac = AccessControl::new(owner());
        assert!(ac.is_owner(&owner()));
        assert!(ac.can_grade(&owner()));
        assert!(!ac.can_grade(&bob()));
    }

    #[test]
    fn test_grant_grader() {
        let mut ac = AccessControl::new(owner());
        assert!(ac.grant_role(&owner(), bob(), Role::Grader));
        assert!(ac.can_grade(&bob()));
        assert!(!ac.is_owner(&bob()));
    }

    #[test]
    fn test_non_owner_cannot_grant() {
        let mut ac = AccessControl::new(owner());
        assert!(!ac.grant_role(&bob(), bob(), Role::Grader));
    }

    #[test]
    fn test_grant_cannot_create_owner() {
        let mut ac = AccessControl::new(owner());
        assert!(!ac.grant_role(&owner(), bob(), Role::Owner));
        assert!(!ac.grant_role(&owner(), owner(), Role::Contributor));
        assert!(ac.is_owner(&owner()));
    }

    #[test]
    fn test_contributor_cannot_grade() {
        let mut ac = AccessControl::new(owner());
        ac.grant_role(&owner(), bob(), Role::Contributor);
        assert!(ac.has_role(&bob(), Role::Contributor));
        assert!(!ac.can_grade(&bob()));
    }
}
