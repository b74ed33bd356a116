//! `warden-guard` — request-boundary authorization contract.
//!
//! This crate is intentionally decoupled from HTTP frameworks and storage:
//! transports implement [`PrincipalSource`] for their own context shape and
//! the guard yields allow/deny verdicts with structured denial reasons.

pub mod claims;
pub mod context;
pub mod guard;
pub mod policy;
pub mod principal;


pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use context::{HttpRequest, PrincipalSource, RpcContext};
pub use guard::{DenialReason, Guard};
pub use policy::AccessPolicy;
pub use principal::{Principal, PrincipalId};
