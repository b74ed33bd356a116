use warden_core::{Permission, Role};

/// Access requirements for a guarded operation.
///
/// Declared statically at the call site and handed to the guard together
/// with the request context. An empty policy allows unconditionally, which
/// is how unguarded operations are expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Roles allowed to perform the operation; empty skips the role check.
    pub required_roles: Vec<Role>,

    /// Permissions the caller must hold, all of them.
    pub required_permissions: Vec<Permission>,
}

impl AccessPolicy {
    /// Policy with no requirements (allows every caller).
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn require_role(mut self, role: impl Into<Role>) -> Self {
        self.required_roles.push(role.into());
        self
    }

    pub fn require_permission(mut self, permission: Permission) -> Self {
        self.required_permissions.push(permission);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.required_roles.is_empty() && self.required_permissions.is_empty()
    }
}
