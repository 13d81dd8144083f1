//! Account status shared by both account stores

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Moderation status of a user or service provider account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Active,
    /// Deactivated from the admin console; login is refused
    Inactive,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown account status: {0}")]
pub struct UnknownStatus(pub String);

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Inactive => "INACTIVE",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AccountStatus::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(AccountStatus::Active),
            "INACTIVE" => Ok(AccountStatus::Inactive),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AccountStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("ACTIVE".parse(), Ok(AccountStatus::Active));
        assert_eq!("INACTIVE".parse(), Ok(AccountStatus::Inactive));
        assert!("BANNED".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn test_default_is_active() {
        assert!(AccountStatus::default().is_active());
        assert!(!AccountStatus::Inactive.is_active());
    }
}
