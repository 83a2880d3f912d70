//! # Role Registry
//!
//! Per-instance mapping from named roles to the principals granted them.
//! Grant and revoke are themselves gated on the administrative role; the
//! membership query is side-effect-free.
//!
//! The registry deliberately performs no last-admin defense: an admin may
//! revoke the final `Admin` membership and permanently lock administrative
//! operations. Callers who want protection against self-lockout must layer
//! it on top.

use crate::domain::value_objects::{Principal, Role};
use crate::errors::EngineError;
use std::collections::{HashMap, HashSet};

/// Set of principals granted each named role.
#[derive(Clone, Debug, Default)]
pub struct RoleRegistry {
    grants: HashMap<Role, HashSet<Principal>>,
}

impl RoleRegistry {
    /// Create a registry with `admin` holding the administrative role.
    #[must_use]
    pub fn new(admin: Principal) -> Self {
        let mut registry = Self::default();
        registry
            .grants
            .entry(Role::Admin)
            .or_default()
            .insert(admin);
        registry
    }

    /// Seed a grant during instance construction, before any caller exists.
    /// Post-construction grants go through `grant`.
    pub fn seed(&mut self, role: Role, principal: Principal) {
        self.grants.entry(role).or_default().insert(principal);
    }

    /// Membership query.
    #[must_use]
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|members| members.contains(principal))
    }

    /// Grant `role` to `principal`. Caller must hold `Admin`.
    pub fn grant(
        &mut self,
        caller: Principal,
        role: Role,
        principal: Principal,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        self.grants.entry(role).or_default().insert(principal);
        Ok(())
    }

    /// Revoke `role` from `principal`. Caller must hold `Admin`.
    pub fn revoke(
        &mut self,
        caller: Principal,
        role: Role,
        principal: Principal,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        if let Some(members) = self.grants.get_mut(&role) {
            members.remove(&principal);
        }
        Ok(())
    }

    /// Fail with `Unauthorized` unless `caller` holds `role`.
    pub fn require(&self, caller: Principal, role: Role) -> Result<(), EngineError> {
        if self.has_role(role, &caller) {
            Ok(())
        } else {
            Err(EngineError::missing_role(caller, role))
        }
    }

    fn require_admin(&self, caller: Principal) -> Result<(), EngineError> {
        self.require(caller, Role::Admin)
    }
}
