//! `warden-rbac` — role registry, inheritance resolution, and the
//! authorization decision engine.
//!
//! Data flow: registry (validated config) → resolver (one-shot, at build) →
//! cache (read-mostly, process lifetime) → engine (per-request queries).

pub mod cache;
pub mod engine;
pub mod registry;
pub mod resolver;
pub mod shared;

pub use cache::PermissionCache;
pub use engine::RbacEngine;
pub use registry::{ConfigError, FALLBACK_DEFAULT_ROLE, RbacConfig, RoleConfig, RoleDef, RoleRegistry};
pub use resolver::{cyclic_roles, resolve};
pub use shared::SharedEngine;
