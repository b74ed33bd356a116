use std::borrow::{Borrow, Cow};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Permission identifier.
///
/// Permissions are `resource:action` capability strings (e.g. "users:read")
/// stored in canonical serialized form. A special wildcard permission `"*"`
/// can be used by policy layers to indicate "allow all" without hardcoding
/// domain permissions into tokens.
///
/// Equality is structural: two permissions with the same resource and action
/// are the same permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// The universal wildcard token.
    pub const WILDCARD: &'static str = "*";

    /// Validate and build a permission from its string form.
    ///
    /// Accepts the wildcard `"*"` or exactly `resource:action` with both
    /// halves non-empty. Anything else is rejected outright; malformed
    /// strings are never truncated into a best-effort permission.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw == Self::WILDCARD {
            return Ok(Self::wildcard());
        }

        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(resource), Some(action), None)
                if !resource.is_empty() && !action.is_empty() =>
            {
                Ok(Self(Cow::Owned(raw.to_string())))
            }
            _ => Err(DomainError::invalid_permission(raw)),
        }
    }

    /// The wildcard permission matching every permission.
    pub fn wildcard() -> Self {
        Self(Cow::Borrowed(Self::WILDCARD))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }

    /// Resource half ("users" in "users:read"); `None` for the wildcard.
    pub fn resource(&self) -> Option<&str> {
        self.as_str().split_once(':').map(|(resource, _)| resource)
    }

    /// Action half ("read" in "users:read"); `None` for the wildcard.
    pub fn action(&self) -> Option<&str> {
        self.as_str().split_once(':').map(|(_, action)| action)
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Allows `HashSet<Permission>` lookups by `&str` without allocating.
impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
