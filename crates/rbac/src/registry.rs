//! Role registry: validated, immutable role configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::{DomainError, DomainResult, Permission, Role};

/// Hardcoded fallback when the configuration names no default role.
pub const FALLBACK_DEFAULT_ROLE: &str = "USER";

/// Raw role entry as it appears in external configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleConfig {
    pub name: String,

    /// Names of roles this role inherits from, in declaration order.
    #[serde(default)]
    pub inherits: Vec<String>,

    /// Directly granted permission strings ("users:read", "*", ...).
    pub permissions: Vec<String>,
}

/// Full RBAC configuration as handed over by the host's config loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RbacConfig {
    /// Role assigned to new principals; falls back to
    /// [`FALLBACK_DEFAULT_ROLE`] when unset.
    #[serde(default)]
    pub default_role: Option<String>,

    /// Role name that short-circuits every permission check to "allowed".
    /// Bypass is disabled unless explicitly named.
    #[serde(default)]
    pub super_admin_role: Option<String>,

    pub roles: Vec<RoleConfig>,
}

/// Error building a registry from raw JSON.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed role configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// A validated role definition: name, inherited role names, direct grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDef {
    name: Role,
    inherits: Vec<Role>,
    permissions: Vec<Permission>,
}

impl RoleDef {
    pub fn name(&self) -> &Role {
        &self.name
    }

    pub fn inherits(&self) -> &[Role] {
        &self.inherits
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Validated, immutable registry of roles.
///
/// Constructed once from external configuration; a replacement registry
/// means building a new engine, never mutating the live one. Every
/// permission string is validated here, so a malformed grant fails the
/// whole registry (fatal at startup, not recoverable per query).
///
/// Duplicate role names are not rejected: name lookups resolve to the last
/// declared entry, while the declaration list keeps every entry.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    default_role: Role,
    super_admin_role: Option<Role>,
    roles: Vec<RoleDef>,
    by_name: HashMap<Role, usize>,
}

impl RoleRegistry {
    /// Validate a raw configuration into a registry.
    pub fn from_config(config: RbacConfig) -> DomainResult<Self> {
        let mut roles = Vec::with_capacity(config.roles.len());
        let mut by_name = HashMap::with_capacity(config.roles.len());

        for entry in config.roles {
            let permissions = entry
                .permissions
                .iter()
                .map(|raw| Permission::parse(raw))
                .collect::<DomainResult<Vec<_>>>()?;

            let def = RoleDef {
                name: Role::from(entry.name),
                inherits: entry.inherits.into_iter().map(Role::from).collect(),
                permissions,
            };

            // Last declaration wins the lookup slot.
            by_name.insert(def.name.clone(), roles.len());
            roles.push(def);
        }

        let default_role = config
            .default_role
            .map(Role::from)
            .unwrap_or_else(|| Role::new(FALLBACK_DEFAULT_ROLE));

        Ok(Self {
            default_role,
            super_admin_role: config.super_admin_role.map(Role::from),
            roles,
            by_name,
        })
    }

    /// Deserialize and validate a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: RbacConfig = serde_json::from_str(raw)?;
        Ok(Self::from_config(config)?)
    }

    /// Look up a role definition by name (last declaration wins).
    pub fn role(&self, name: &str) -> Option<&RoleDef> {
        self.by_name.get(name).map(|&idx| &self.roles[idx])
    }

    /// Whether a role with this name was declared.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All declared role definitions, in declaration order (duplicates kept).
    pub fn roles(&self) -> &[RoleDef] {
        &self.roles
    }

    pub fn default_role(&self) -> &Role {
        &self.default_role
    }

    pub fn super_admin_role(&self) -> Option<&Role> {
        self.super_admin_role.as_ref()
    }
}
