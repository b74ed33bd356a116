//! Authorization decision engine.
//!
//! Pure, synchronous queries against a validated registry and its resolved
//! cache. No IO, no panics, no business logic.

use std::collections::HashSet;

use warden_core::{Permission, Role};

use crate::cache::PermissionCache;
use crate::registry::RoleRegistry;

/// Decision engine over a registry and the cache built from it.
///
/// All queries take `&self` and are side-effect-free, so one engine behind
/// an `Arc` serves every concurrent request-handling thread without locking.
#[derive(Debug, Clone)]
pub struct RbacEngine {
    registry: RoleRegistry,
    cache: PermissionCache,
}

impl RbacEngine {
    /// Build the engine, resolving and caching every declared role.
    pub fn new(registry: RoleRegistry) -> Self {
        let cache = PermissionCache::build(&registry);
        Self { registry, cache }
    }

    /// True iff `role` may exercise `permission`.
    ///
    /// The super-admin bypass is checked before the cache lookup so a
    /// missing or misconfigured cache entry for that role can never defeat
    /// it. Otherwise: absent role → false; present set → exact match or
    /// wildcard.
    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        if self
            .registry
            .super_admin_role()
            .is_some_and(|admin| admin.as_str() == role)
        {
            return true;
        }

        match self.cache.lookup(role) {
            Some(permissions) => {
                permissions.contains(permission) || permissions.contains(Permission::WILDCARD)
            }
            None => false,
        }
    }

    /// True iff `role` holds every listed permission. Vacuously true for an
    /// empty list.
    pub fn has_all_permissions<P: AsRef<str>>(&self, role: &str, permissions: &[P]) -> bool {
        permissions
            .iter()
            .all(|p| self.has_permission(role, p.as_ref()))
    }

    /// True iff `role` holds at least one listed permission. False for an
    /// empty list.
    pub fn has_any_permission<P: AsRef<str>>(&self, role: &str, permissions: &[P]) -> bool {
        permissions
            .iter()
            .any(|p| self.has_permission(role, p.as_ref()))
    }

    /// Resolved permission set for `role`, or empty if undeclared. This
    /// boundary does not distinguish absent from declared-empty.
    pub fn permissions_for_role(&self, role: &str) -> HashSet<Permission> {
        self.cache.lookup(role).cloned().unwrap_or_default()
    }

    /// Role assigned to new principals.
    pub fn default_role(&self) -> &Role {
        self.registry.default_role()
    }

    /// Whether a role with this name was declared.
    pub fn role_exists(&self, role: &str) -> bool {
        self.registry.contains(role)
    }

    /// All declared role names, in declaration order.
    pub fn all_roles(&self) -> Vec<Role> {
        self.registry
            .roles()
            .iter()
            .map(|def| def.name().clone())
            .collect()
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &PermissionCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RbacConfig, RoleConfig, RoleRegistry};

    fn role_entry(name: &str, inherits: &[&str], permissions: &[&str]) -> RoleConfig {
        RoleConfig {
            name: name.to_string(),
            inherits: inherits.iter().map(|s| s.to_string()).collect(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn engine(config: RbacConfig) -> RbacEngine {
        RbacEngine::new(RoleRegistry::from_config(config).unwrap())
    }

    fn two_role_engine() -> RbacEngine {
        engine(RbacConfig {
            default_role: None,
            super_admin_role: None,
            roles: vec![
                role_entry("USER", &[], &["profile:read"]),
                role_entry("ADMIN", &["USER"], &["users:write"]),
            ],
        })
    }

    #[test]
    fn inherited_permission_is_granted() {
        let engine = two_role_engine();

        assert!(engine.has_permission("ADMIN", "profile:read"));
        assert!(engine.has_permission("ADMIN", "users:write"));
        assert!(!engine.has_permission("USER", "users:write"));
    }

    #[test]
    fn has_all_permissions_requires_every_grant() {
        let engine = two_role_engine();

        assert!(engine.has_all_permissions("ADMIN", &["profile:read", "users:write"]));
        assert!(!engine.has_all_permissions("USER", &["profile:read", "users:write"]));
        // Empty requirement list is vacuously satisfied.
        assert!(engine.has_all_permissions("USER", &[] as &[&str]));
        assert!(engine.has_all_permissions("GHOST", &[] as &[&str]));
    }

    #[test]
    fn has_any_permission_requires_at_least_one() {
        let engine = two_role_engine();

        assert!(engine.has_any_permission("USER", &["profile:read", "users:write"]));
        assert!(!engine.has_any_permission("USER", &["users:write", "users:delete"]));
        assert!(!engine.has_any_permission("ADMIN", &[] as &[&str]));
    }

    #[test]
    fn wildcard_grant_matches_arbitrary_permissions() {
        let engine = engine(RbacConfig {
            default_role: None,
            super_admin_role: None,
            roles: vec![role_entry("ROOT", &[], &["*"])],
        });

        assert!(engine.has_permission("ROOT", "anything:at-all"));
        assert!(engine.has_permission("ROOT", "never:declared"));
    }

    #[test]
    fn super_admin_bypasses_even_when_undeclared() {
        let engine = engine(RbacConfig {
            default_role: None,
            super_admin_role: Some("SUPER_ADMIN".to_string()),
            roles: vec![role_entry("USER", &[], &["profile:read"])],
        });

        // SUPER_ADMIN has no role entry and no cache entry.
        assert!(!engine.role_exists("SUPER_ADMIN"));
        assert!(engine.has_permission("SUPER_ADMIN", "nonexistent:permission"));
    }

    #[test]
    fn unknown_role_grants_nothing() {
        let engine = two_role_engine();

        assert!(!engine.has_permission("GHOST", "profile:read"));
        assert!(engine.permissions_for_role("GHOST").is_empty());
        assert!(!engine.role_exists("GHOST"));
    }

    #[test]
    fn permissions_for_role_returns_resolved_set() {
        let engine = two_role_engine();

        let admin = engine.permissions_for_role("ADMIN");
        assert_eq!(admin.len(), 2);
        assert!(admin.contains("profile:read"));
    }

    #[test]
    fn registry_introspection() {
        let engine = engine(RbacConfig {
            default_role: Some("MEMBER".to_string()),
            super_admin_role: None,
            roles: vec![
                role_entry("MEMBER", &[], &["profile:read"]),
                role_entry("ADMIN", &["MEMBER"], &["users:write"]),
            ],
        });

        assert_eq!(engine.default_role().as_str(), "MEMBER");
        assert_eq!(
            engine.all_roles(),
            vec![Role::new("MEMBER"), Role::new("ADMIN")]
        );
        assert!(engine.role_exists("ADMIN"));
    }
}
