//! Resolved-permission cache.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use warden_core::{Permission, Role};

use crate::registry::RoleRegistry;
use crate::resolver;

/// Immutable mapping from role name to its resolved permission set.
///
/// Built once per registry (process start or config swap) and read on every
/// authorization check. Keys are the *declared* roles: a role referenced
/// only through inheritance still resolves transitively but never becomes a
/// cache key of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCache {
    entries: HashMap<Role, HashSet<Permission>>,
}

impl PermissionCache {
    /// Build the cache by resolving every declared role once, each with a
    /// fresh visited set.
    ///
    /// Cyclic inheritance is not a build failure: the cyclic branch simply
    /// contributes nothing to the resolved set. A warning names the affected
    /// roles so operators can spot grants that were silently dropped.
    pub fn build(registry: &RoleRegistry) -> Self {
        let cyclic = resolver::cyclic_roles(registry);
        if !cyclic.is_empty() {
            warn!(
                roles = ?cyclic.iter().map(Role::as_str).collect::<Vec<_>>(),
                "inheritance cycle detected; permissions granted through the cycle are dropped"
            );
        }

        let mut entries = HashMap::with_capacity(registry.roles().len());
        for role in registry.roles() {
            entries.insert(
                role.name().clone(),
                resolver::resolve(role.name().as_str(), registry),
            );
        }

        Self { entries }
    }

    /// Pure read of a role's resolved permissions.
    ///
    /// `None` means "this role was never declared", distinct from a declared
    /// role with zero permissions (present key, empty set).
    pub fn lookup(&self, role_name: &str) -> Option<&HashSet<Permission>> {
        self.entries.get(role_name)
    }

    /// Number of cached roles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
