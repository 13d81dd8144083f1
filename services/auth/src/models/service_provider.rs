//! Service provider model

use chrono::{DateTime, Utc};
use common::account::AccountStatus;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Service provider entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceProvider {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: String,
    pub state: String,
    pub district: String,
    #[sqlx(try_from = "String")]
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New service provider creation payload, with the names of the services
/// it offers
#[derive(Debug, Clone)]
pub struct NewServiceProvider {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub state: String,
    pub district: String,
    pub services: Vec<String>,
}
