//! Role tags carried by accounts and session tokens

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role of an authenticated account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Service seeker
    User,
    /// Console administrator, stored in the users table
    Admin,
    /// Service vendor, implied by the service_providers table
    ServiceProvider,
}

/// Raised when a stored or submitted role tag is not recognised
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::ServiceProvider => "SERVICE_PROVIDER",
        }
    }

    /// Landing page for a freshly logged-in account of this role
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::User => "/user/dashboard",
            Role::Admin => "/admin/dashboard",
            Role::ServiceProvider => "/service-provider/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            "SERVICE_PROVIDER" => Ok(Role::ServiceProvider),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Redirect target for a role that may not be known
pub fn landing_path(role: Option<Role>) -> &'static str {
    role.map(|r| r.dashboard_path()).unwrap_or("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_its_tag() {
        for role in [Role::User, Role::Admin, Role::ServiceProvider] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_eq!(
            "SUPERUSER".parse::<Role>(),
            Err(UnknownRole("SUPERUSER".to_string()))
        );
        assert!("user".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_screaming_tags() {
        let json = serde_json::to_string(&Role::ServiceProvider).unwrap();
        assert_eq!(json, "\"SERVICE_PROVIDER\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(landing_path(Some(Role::User)), "/user/dashboard");
        assert_eq!(landing_path(Some(Role::Admin)), "/admin/dashboard");
        assert_eq!(
            landing_path(Some(Role::ServiceProvider)),
            "/service-provider/dashboard"
        );
        assert_eq!(landing_path(None), "/");
    }
}
