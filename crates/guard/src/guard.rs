//! Allow/deny decision protocol at the request boundary.

use std::sync::Arc;

use thiserror::Error;

use warden_core::{Permission, Role};
use warden_rbac::RbacEngine;

use crate::context::PrincipalSource;
use crate::policy::AccessPolicy;

/// Why a request was denied.
///
/// Denials are expected outcomes, not faults: the guard never panics and
/// never surfaces unchecked errors into the host pipeline. Each variant
/// names the specific missing requirement so callers can log or message
/// precisely.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The request carries no principal, or the principal has no role.
    #[error("no role assigned")]
    NoRole,

    /// The principal's role is not in the operation's required-role set.
    #[error("required roles: {}", comma_join(.required))]
    InsufficientRole { required: Vec<Role> },

    /// The role check passed but some required permissions are not granted.
    #[error("missing permissions: {}", comma_join(.missing))]
    MissingPermissions { missing: Vec<Permission> },
}

fn comma_join<T: AsRef<str>>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Request-boundary guard.
///
/// Extracts the principal from an arbitrary context shape (via
/// [`PrincipalSource`]) and applies a declared [`AccessPolicy`]. Stateless
/// per call; the engine it holds is shared read-only state, so one guard
/// serves concurrent requests.
#[derive(Debug, Clone)]
pub struct Guard {
    engine: Arc<RbacEngine>,
}

impl Guard {
    pub fn new(engine: Arc<RbacEngine>) -> Self {
        Self { engine }
    }

    /// Decide whether the context may perform the guarded operation.
    ///
    /// Decision order:
    /// 1. an empty policy allows unconditionally;
    /// 2. a missing principal or missing role denies with
    ///    [`DenialReason::NoRole`];
    /// 3. when required roles are declared, the principal's role must be
    ///    among them;
    /// 4. token-attached permissions (or their wildcard) covering every
    ///    required permission allow without consulting the engine;
    /// 5. otherwise the engine's resolved cache decides, and a denial names
    ///    exactly the permissions that failed.
    pub fn check<S: PrincipalSource>(
        &self,
        policy: &AccessPolicy,
        context: &S,
    ) -> Result<(), DenialReason> {
        if policy.is_empty() {
            return Ok(());
        }

        let Some(principal) = context.principal() else {
            return Err(DenialReason::NoRole);
        };
        let Some(role) = principal.role.as_ref() else {
            return Err(DenialReason::NoRole);
        };

        if !policy.required_roles.is_empty() && !policy.required_roles.contains(role) {
            return Err(DenialReason::InsufficientRole {
                required: policy.required_roles.clone(),
            });
        }

        if policy.required_permissions.is_empty() {
            return Ok(());
        }

        // Fast path: the token already carries a permission list.
        if let Some(attached) = principal.permissions.as_deref() {
            if covered_by(&policy.required_permissions, attached) {
                return Ok(());
            }
        }

        let missing: Vec<Permission> = policy
            .required_permissions
            .iter()
            .filter(|p| !self.engine.has_permission(role.as_str(), p.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DenialReason::MissingPermissions { missing })
        }
    }

    pub fn engine(&self) -> &RbacEngine {
        &self.engine
    }
}

/// True when every required permission appears in the attached list, or the
/// attached list carries the wildcard.
fn covered_by(required: &[Permission], attached: &[String]) -> bool {
    if attached.iter().any(|p| p == Permission::WILDCARD) {
        return true;
    }
    required
        .iter()
        .all(|r| attached.iter().any(|a| a == r.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{HttpRequest, RpcContext};
    use crate::principal::{Principal, PrincipalId};
    use warden_rbac::{RbacConfig, RoleConfig, RoleRegistry};

    fn test_engine() -> Arc<RbacEngine> {
        let registry = RoleRegistry::from_config(RbacConfig {
            default_role: None,
            super_admin_role: Some("SUPER_ADMIN".to_string()),
            roles: vec![
                RoleConfig {
                    name: "USER".to_string(),
                    inherits: vec![],
                    permissions: vec!["profile:read".to_string()],
                },
                RoleConfig {
                    name: "ADMIN".to_string(),
                    inherits: vec!["USER".to_string()],
                    permissions: vec!["users:write".to_string()],
                },
            ],
        })
        .unwrap();
        Arc::new(RbacEngine::new(registry))
    }

    fn guard() -> Guard {
        Guard::new(test_engine())
    }

    fn user(role: &str) -> Principal {
        Principal::new(PrincipalId::new()).with_role(role.to_string())
    }

    fn perm(raw: &str) -> Permission {
        Permission::parse(raw).unwrap()
    }

    #[test]
    fn empty_policy_allows_unauthenticated_requests() {
        let request = HttpRequest::new("GET", "/health");
        assert!(guard().check(&AccessPolicy::allow_all(), &request).is_ok());
    }

    #[test]
    fn missing_principal_denies_with_no_role() {
        let policy = AccessPolicy::allow_all().require_role("ADMIN");
        let request = HttpRequest::new("GET", "/admin");

        assert_eq!(
            guard().check(&policy, &request),
            Err(DenialReason::NoRole)
        );
    }

    #[test]
    fn principal_without_role_denies_with_no_role() {
        let policy = AccessPolicy::allow_all().require_permission(perm("profile:read"));
        let request =
            HttpRequest::new("GET", "/profile").with_principal(Principal::new(PrincipalId::new()));

        assert_eq!(
            guard().check(&policy, &request),
            Err(DenialReason::NoRole)
        );
    }

    #[test]
    fn role_membership_is_enforced_when_declared() {
        let policy = AccessPolicy::allow_all().require_role("ADMIN");

        let admin = HttpRequest::new("GET", "/admin").with_principal(user("ADMIN"));
        assert!(guard().check(&policy, &admin).is_ok());

        let plain = HttpRequest::new("GET", "/admin").with_principal(user("USER"));
        assert_eq!(
            guard().check(&policy, &plain),
            Err(DenialReason::InsufficientRole {
                required: vec![Role::new("ADMIN")],
            })
        );
    }

    #[test]
    fn permission_fallback_consults_the_engine() {
        let policy = AccessPolicy::allow_all()
            .require_permission(perm("profile:read"))
            .require_permission(perm("users:write"));

        let admin = RpcContext::new("users.update").with_principal(user("ADMIN"));
        assert!(guard().check(&policy, &admin).is_ok());

        let plain = RpcContext::new("users.update").with_principal(user("USER"));
        assert_eq!(
            guard().check(&policy, &plain),
            Err(DenialReason::MissingPermissions {
                missing: vec![perm("users:write")],
            })
        );
    }

    #[test]
    fn denial_names_only_the_missing_permissions() {
        let policy = AccessPolicy::allow_all()
            .require_permission(perm("profile:read"))
            .require_permission(perm("users:write"))
            .require_permission(perm("settings:manage"));

        let plain = HttpRequest::new("POST", "/settings").with_principal(user("USER"));
        let Err(DenialReason::MissingPermissions { missing }) = guard().check(&policy, &plain)
        else {
            panic!("expected a missing-permission denial");
        };

        assert_eq!(missing, vec![perm("users:write"), perm("settings:manage")]);
    }

    #[test]
    fn attached_permissions_allow_without_engine_lookup() {
        // The attached list grants a permission the registry never declares,
        // so an allow here proves the engine was not consulted.
        let policy = AccessPolicy::allow_all().require_permission(perm("reports:export"));
        let principal = user("USER").with_permissions(vec!["reports:export".to_string()]);
        let request = HttpRequest::new("GET", "/reports").with_principal(principal);

        assert!(guard().check(&policy, &request).is_ok());
    }

    #[test]
    fn attached_wildcard_covers_everything() {
        let policy = AccessPolicy::allow_all()
            .require_permission(perm("users:write"))
            .require_permission(perm("settings:manage"));
        let principal = user("USER").with_permissions(vec!["*".to_string()]);
        let request = HttpRequest::new("POST", "/settings").with_principal(principal);

        assert!(guard().check(&policy, &request).is_ok());
    }

    #[test]
    fn insufficient_attached_permissions_fall_back_to_the_engine() {
        // Attached list misses users:write, but ADMIN's resolved set has it.
        let policy = AccessPolicy::allow_all().require_permission(perm("users:write"));
        let principal = user("ADMIN").with_permissions(vec!["profile:read".to_string()]);
        let request = HttpRequest::new("POST", "/users").with_principal(principal);

        assert!(guard().check(&policy, &request).is_ok());
    }

    #[test]
    fn super_admin_role_passes_permission_checks() {
        let policy = AccessPolicy::allow_all().require_permission(perm("anything:at-all"));
        let request = RpcContext::new("anything").with_principal(user("SUPER_ADMIN"));

        assert!(guard().check(&policy, &request).is_ok());
    }

    #[test]
    fn denial_reasons_render_their_specifics() {
        assert_eq!(DenialReason::NoRole.to_string(), "no role assigned");
        assert_eq!(
            DenialReason::InsufficientRole {
                required: vec![Role::new("ADMIN"), Role::new("MODERATOR")],
            }
            .to_string(),
            "required roles: ADMIN, MODERATOR"
        );
        assert_eq!(
            DenialReason::MissingPermissions {
                missing: vec![perm("users:write")],
            }
            .to_string(),
            "missing permissions: users:write"
        );
    }
}
