//! Credential verification across the two account stores
//!
//! Users are checked first, then service providers. The first account whose
//! stored hash matches the password wins, and its role follows from the
//! store it was found in.

use common::error::DatabaseError;
use common::role::Role;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::Account;
use crate::password::verify_password;
use crate::repositories::AccountStore;

/// Outcome of a failed verification
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No account matched the email and password
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The password matched but the account has been deactivated
    #[error("account is disabled")]
    AccountDisabled,

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

/// Identity and role of a successfully verified account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccount {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub name: String,
}

impl From<&Account> for VerifiedAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            role: account.role(),
            email: account.email().to_string(),
            name: account.name().to_string(),
        }
    }
}

/// Verify an email/password pair against users, then service providers
#[instrument(skip(store, password))]
pub async fn verify_credentials(
    store: &dyn AccountStore,
    email: &str,
    password: &str,
) -> Result<VerifiedAccount, CredentialError> {
    if email.is_empty() || password.is_empty() {
        return Err(CredentialError::InvalidCredentials);
    }

    let user = store.find_user_by_email(email).await?.map(Account::User);
    if let Some(account) = matching(user, password) {
        return accept(&account);
    }

    let provider = store
        .find_service_provider_by_email(email)
        .await?
        .map(Account::ServiceProvider);
    if let Some(account) = matching(provider, password) {
        return accept(&account);
    }

    info!("No account matched the supplied credentials");
    Err(CredentialError::InvalidCredentials)
}

fn matching(account: Option<Account>, password: &str) -> Option<Account> {
    account.filter(|account| verify_password(password, account.password_hash()))
}

fn accept(account: &Account) -> Result<VerifiedAccount, CredentialError> {
    if !account.status().is_active() {
        info!(account_id = %account.id(), "Refusing login for disabled account");
        return Err(CredentialError::AccountDisabled);
    }

    Ok(VerifiedAccount::from(account))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewServiceProvider, NewUser};
    use crate::password::hash_password;
    use crate::repositories::memory::MemoryAccountStore;
    use common::account::AccountStatus;

    async fn store_with_accounts() -> MemoryAccountStore {
        let store = MemoryAccountStore::default();
        store
            .create_user(&NewUser {
                name: "User 1".to_string(),
                email: "user1@example.com".to_string(),
                password_hash: hash_password("password123").unwrap(),
                phone_number: "123-456-7891".to_string(),
                role: Role::User,
            })
            .await
            .unwrap();
        store
            .create_user(&NewUser {
                name: "Admin 1".to_string(),
                email: "admin1@example.com".to_string(),
                password_hash: hash_password("adminpass123").unwrap(),
                phone_number: "555-555-5551".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        store
            .create_service_provider(&NewServiceProvider {
                name: "Service Provider 1".to_string(),
                email: "provider1@example.com".to_string(),
                password_hash: hash_password("password123").unwrap(),
                phone_number: "987-654-3211".to_string(),
                state: "New York".to_string(),
                district: "Manhattan".to_string(),
                services: vec!["Inspections".to_string()],
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_user_with_matching_password_logs_in_as_user() {
        let store = store_with_accounts().await;

        let account = verify_credentials(&store, "user1@example.com", "password123")
            .await
            .unwrap();

        assert_eq!(account.role, Role::User);
        assert_eq!(account.email, "user1@example.com");
    }

    #[tokio::test]
    async fn test_admin_role_is_taken_from_the_user_row() {
        let store = store_with_accounts().await;

        let account = verify_credentials(&store, "admin1@example.com", "adminpass123")
            .await
            .unwrap();

        assert_eq!(account.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_service_provider_is_found_in_second_store() {
        let store = store_with_accounts().await;

        let account = verify_credentials(&store, "provider1@example.com", "password123")
            .await
            .unwrap();

        assert_eq!(account.role, Role::ServiceProvider);
        assert_eq!(account.name, "Service Provider 1");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected_in_either_store() {
        let store = store_with_accounts().await;

        for email in ["user1@example.com", "provider1@example.com"] {
            let result = verify_credentials(&store, email, "wrong-password").await;
            assert!(matches!(result, Err(CredentialError::InvalidCredentials)));
        }
    }

    #[tokio::test]
    async fn test_unknown_email_is_rejected() {
        let store = store_with_accounts().await;

        let result = verify_credentials(&store, "nobody@example.com", "password123").await;
        assert!(matches!(result, Err(CredentialError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_empty_credentials_are_rejected() {
        let store = store_with_accounts().await;

        assert!(verify_credentials(&store, "", "password123").await.is_err());
        assert!(verify_credentials(&store, "user1@example.com", "").await.is_err());
    }

    #[tokio::test]
    async fn test_user_mismatch_falls_through_to_service_provider() {
        let store = store_with_accounts().await;
        // Same email in both stores with different passwords: the provider
        // password must still succeed once the user check fails.
        store
            .create_service_provider(&NewServiceProvider {
                name: "Twin Provider".to_string(),
                email: "user1@example.com".to_string(),
                password_hash: hash_password("provider-secret").unwrap(),
                phone_number: "987-654-3219".to_string(),
                state: "California".to_string(),
                district: "Los Angeles".to_string(),
                services: vec![],
            })
            .await
            .unwrap();

        let account = verify_credentials(&store, "user1@example.com", "provider-secret")
            .await
            .unwrap();
        assert_eq!(account.role, Role::ServiceProvider);

        let account = verify_credentials(&store, "user1@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(account.role, Role::User);
    }

    #[tokio::test]
    async fn test_disabled_account_is_refused() {
        let store = store_with_accounts().await;
        store.set_user_status("user1@example.com", AccountStatus::Inactive);

        let result = verify_credentials(&store, "user1@example.com", "password123").await;
        assert!(matches!(result, Err(CredentialError::AccountDisabled)));
    }
}
