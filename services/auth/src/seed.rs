//! Demo data for local environments

use anyhow::Result;
use common::role::Role;
use serde::Serialize;
use tracing::info;

use crate::models::{NewServiceProvider, NewUser};
use crate::password::hash_password;
use crate::repositories::AccountStore;

const USER_COUNT: u32 = 10;
const PROVIDER_COUNT: u32 = 5;
const ADMIN_COUNT: u32 = 2;

const USER_PASSWORD: &str = "password123";
const ADMIN_PASSWORD: &str = "adminpass123";

const DEMO_SERVICES: [&str; 5] = [
    "Agriculture & Forestry",
    "Construction & Infrastructure",
    "Inspections",
    "Security & Surveillance",
    "Entertainment & Media",
];

/// Accounts created by one seeding run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub users: u32,
    pub service_providers: u32,
    pub admins: u32,
}

/// Insert demo users, service providers and admins
///
/// Accounts whose email is already taken are left untouched, so running the
/// seed twice creates nothing the second time.
pub async fn seed_demo_data(store: &dyn AccountStore) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    // One hash per password keeps seeding fast; salts still differ per run.
    let user_hash = hash_password(USER_PASSWORD)?;
    let admin_hash = hash_password(ADMIN_PASSWORD)?;

    for i in 1..=USER_COUNT {
        let email = format!("user{}@example.com", i);
        if store.email_in_use(&email).await? {
            continue;
        }
        store
            .create_user(&NewUser {
                name: format!("User {}", i),
                email,
                password_hash: user_hash.clone(),
                phone_number: format!("123-456-{}", 7890 + i),
                role: Role::User,
            })
            .await?;
        summary.users += 1;
    }

    for i in 1..=PROVIDER_COUNT {
        let email = format!("provider{}@example.com", i);
        if store.email_in_use(&email).await? {
            continue;
        }
        let (state, district) = if i % 2 == 0 {
            ("California", "Los Angeles")
        } else {
            ("New York", "Manhattan")
        };
        store
            .create_service_provider(&NewServiceProvider {
                name: format!("Service Provider {}", i),
                email,
                password_hash: user_hash.clone(),
                phone_number: format!("987-654-{}", 3210 + i),
                state: state.to_string(),
                district: district.to_string(),
                services: DEMO_SERVICES.iter().map(|s| s.to_string()).collect(),
            })
            .await?;
        summary.service_providers += 1;
    }

    for i in 1..=ADMIN_COUNT {
        let email = format!("admin{}@example.com", i);
        if store.email_in_use(&email).await? {
            continue;
        }
        store
            .create_user(&NewUser {
                name: format!("Admin {}", i),
                email,
                password_hash: admin_hash.clone(),
                phone_number: format!("555-555-{}", 5550 + i),
                role: Role::Admin,
            })
            .await?;
        summary.admins += 1;
    }

    info!(
        users = summary.users,
        service_providers = summary.service_providers,
        admins = summary.admins,
        "Demo data seeded"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::verify_credentials;
    use crate::repositories::memory::MemoryAccountStore;

    #[tokio::test]
    async fn test_seed_creates_every_account() {
        let store = MemoryAccountStore::default();

        let summary = seed_demo_data(&store).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                users: 10,
                service_providers: 5,
                admins: 2
            }
        );
        assert_eq!(store.user_count(), 12);
        assert_eq!(store.provider_count(), 5);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryAccountStore::default();
        seed_demo_data(&store).await.unwrap();

        let second = seed_demo_data(&store).await.unwrap();

        assert_eq!(second, SeedSummary::default());
        assert_eq!(store.user_count(), 12);
    }

    #[tokio::test]
    async fn test_seeded_accounts_can_log_in() {
        let store = MemoryAccountStore::default();
        seed_demo_data(&store).await.unwrap();

        let admin = verify_credentials(&store, "admin2@example.com", ADMIN_PASSWORD)
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        let provider = verify_credentials(&store, "provider4@example.com", USER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(provider.role, Role::ServiceProvider);

        let user = verify_credentials(&store, "user10@example.com", USER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);
    }
}
