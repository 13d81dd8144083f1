//! API models for request and response payloads

use chrono::{DateTime, NaiveDate, Utc};
use common::{account::AccountStatus, role::Role};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// A service offered by a provider
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub service_provider_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A gallery image of a provider
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub url: String,
    pub service_provider_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A provider's own profile, without credentials
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub state: String,
    pub district: String,
    pub availability: serde_json::Value,
    #[sqlx(try_from = "String")]
    pub status: AccountStatus,
    pub contact_clicks: i64,
    pub created_at: DateTime<Utc>,
}

/// Distinct values offered as discovery filters
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOptions {
    pub services: Vec<String>,
    pub states: Vec<String>,
    pub districts: Vec<String>,
}

/// Body of service create and rename requests
#[derive(Debug, Deserialize)]
pub struct ServiceNameRequest {
    #[serde(default)]
    pub name: String,
}

/// Body of image creation requests
#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub url: Option<String>,
}

/// Answer to a contact click
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub phone_number: String,
}

/// User row as shown in the admin console
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub status: AccountStatus,
}

/// Service provider row as shown in the admin console
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminServiceProvider {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub services: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: AccountStatus,
}

/// New accounts on one day
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPoint {
    pub date: NaiveDate,
    pub users: i64,
    pub service_providers: i64,
}

/// Contact clicks collected by one provider
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactClickPoint {
    pub service_provider: String,
    pub clicks: i64,
}

/// Account totals for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccountCounts {
    pub users: i64,
    pub admins: i64,
    pub service_providers: i64,
}

/// Body of admin account actions
#[derive(Debug, Deserialize)]
pub struct AdminActionRequest {
    #[serde(default)]
    pub action: String,
}

/// Moderation action on an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Activate,
    Deactivate,
    Delete,
}

impl AdminAction {
    /// Status an account ends up in, `None` for deletion
    pub fn target_status(&self) -> Option<AccountStatus> {
        match self {
            AdminAction::Activate => Some(AccountStatus::Active),
            AdminAction::Deactivate => Some(AccountStatus::Inactive),
            AdminAction::Delete => None,
        }
    }
}

impl FromStr for AdminAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activate" => Ok(AdminAction::Activate),
            "deactivate" => Ok(AdminAction::Deactivate),
            "delete" => Ok(AdminAction::Delete),
            other => Err(format!("Invalid action: {}", other)),
        }
    }
}
