//! Account registration

use common::error::DatabaseError;
use common::role::Role;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::models::{Account, NewServiceProvider, NewUser};
use crate::password::hash_password;
use crate::repositories::AccountStore;
use crate::validation::{
    normalize_email, validate_email, validate_name, validate_password, validate_phone_number,
};

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub role: String,
    pub state: Option<String>,
    pub district: Option<String>,
    pub services: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid role")]
    InvalidRole,

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(DatabaseError),
}

impl From<DatabaseError> for RegistrationError {
    fn from(err: DatabaseError) -> Self {
        // Two concurrent registrations can both pass the existence check;
        // the table's unique index settles the race.
        if err.is_unique_violation() {
            RegistrationError::EmailInUse
        } else {
            RegistrationError::Store(err)
        }
    }
}

/// Register a user or a service provider
///
/// The email must be free in both stores. Only `USER` and
/// `SERVICE_PROVIDER` may self-register; admins are provisioned out of band.
#[instrument(skip(store, request), fields(email = %request.email, role = %request.role))]
pub async fn register(
    store: &dyn AccountStore,
    request: RegistrationRequest,
) -> Result<Account, RegistrationError> {
    validate_name(&request.name).map_err(RegistrationError::Validation)?;
    let email = normalize_email(&request.email);
    validate_email(&email).map_err(RegistrationError::Validation)?;
    validate_password(&request.password).map_err(RegistrationError::Validation)?;
    validate_phone_number(&request.phone_number).map_err(RegistrationError::Validation)?;

    if store.email_in_use(&email).await? {
        info!("Registration rejected, email already in use");
        return Err(RegistrationError::EmailInUse);
    }

    let role = match request.role.parse::<Role>() {
        Ok(Role::User) => Role::User,
        Ok(Role::ServiceProvider) => Role::ServiceProvider,
        _ => return Err(RegistrationError::InvalidRole),
    };

    let password_hash =
        hash_password(&request.password).map_err(|e| RegistrationError::Hash(e.to_string()))?;

    let account = match role {
        Role::ServiceProvider => {
            let state = required_location(request.state, "State")?;
            let district = required_location(request.district, "District")?;

            let provider = store
                .create_service_provider(&NewServiceProvider {
                    name: request.name.trim().to_string(),
                    email,
                    password_hash,
                    phone_number: request.phone_number.trim().to_string(),
                    state,
                    district,
                    services: clean_service_names(request.services.unwrap_or_default()),
                })
                .await?;
            Account::ServiceProvider(provider)
        }
        _ => {
            let user = store
                .create_user(&NewUser {
                    name: request.name.trim().to_string(),
                    email,
                    password_hash,
                    phone_number: request.phone_number.trim().to_string(),
                    role: Role::User,
                })
                .await?;
            Account::User(user)
        }
    };

    info!(account_id = %account.id(), "Registration successful");
    Ok(account)
}

fn required_location(value: Option<String>, field: &str) -> Result<String, RegistrationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            RegistrationError::Validation(format!("{} is required for service providers", field))
        })
}

/// Trim, drop blanks and duplicates, keep submission order
pub fn clean_service_names(services: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(services.len());
    for name in services {
        let name = name.trim();
        if !name.is_empty() && !cleaned.iter().any(|existing| existing == name) {
            cleaned.push(name.to_string());
        }
    }
    cleaned
}
