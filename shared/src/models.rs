//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller role resolved by the access policy
///
/// Roles are derived from the authenticated identity, never stored on the
/// order aggregate:
/// - `User`: a regular account, owner of its own orders
/// - `Moderator`: catalog management and order approval authority
/// - `RemoteService`: trusted non-human caller, only writes computed doses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Moderator,
    RemoteService,
}

impl Role {
    /// Stable string form stored in JWT claims and the account table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::RemoteService => "remote_service",
        }
    }

    pub fn is_moderator(&self) -> bool {
        matches!(self, Self::Moderator)
    }

    pub fn is_remote_service(&self) -> bool {
        matches!(self, Self::RemoteService)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized role strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRole(pub String);

impl fmt::Display for InvalidRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for InvalidRole {}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "remote_service" => Ok(Self::RemoteService),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::User, Role::Moderator, Role::RemoteService] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&Role::RemoteService).unwrap(),
            "\"remote_service\""
        );
        let role: Role = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, Role::Moderator);
    }

    #[test]
    fn test_invalid_role_rejected() {
        assert!("admin".parse::<Role>().is_err());
    }
}
