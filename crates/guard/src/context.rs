//! Request-context shapes and principal extraction.

use crate::principal::Principal;

/// Capability to extract the authenticated principal from a request context.
///
/// The guard depends only on this interface; each transport normalizes its
/// own context shape into the same [`Principal`]. `None` means the request
/// carries no authenticated identity at all.
pub trait PrincipalSource {
    fn principal(&self) -> Option<&Principal>;
}

/// Conventional request/response context.
///
/// The authentication middleware runs ahead of the guard and attaches the
/// decoded principal to the request, mirroring how bearer-token middleware
/// stores identity in request extensions.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    principal: Option<Principal>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            principal: None,
        }
    }

    /// Attach the principal the authentication layer decoded for this
    /// request.
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }
}

impl PrincipalSource for HttpRequest {
    fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

/// Point-to-point RPC / subscription context.
///
/// Long-lived connections authenticate once at connection setup; the
/// principal established there is shared by every operation on the
/// connection.
#[derive(Debug, Clone, Default)]
pub struct RpcContext {
    pub operation: String,
    principal: Option<Principal>,
}

impl RpcContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            principal: None,
        }
    }

    /// Attach the principal established at connection setup.
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }
}

impl PrincipalSource for RpcContext {
    fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}
