//! Account repository spanning the users and service_providers tables

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use crate::models::{NewServiceProvider, NewUser, ServiceProvider, User};

/// Persistence seam for the credential and registration flows
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find a user (or admin) by email
    async fn find_user_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Find a service provider by email
    async fn find_service_provider_by_email(
        &self,
        email: &str,
    ) -> DatabaseResult<Option<ServiceProvider>>;

    /// Create a user row
    async fn create_user(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Create a service provider row together with its services
    async fn create_service_provider(
        &self,
        new_provider: &NewServiceProvider,
    ) -> DatabaseResult<ServiceProvider>;

    /// Whether the email is taken in either store
    async fn email_in_use(&self, email: &str) -> DatabaseResult<bool> {
        if self.find_user_by_email(email).await?.is_some() {
            return Ok(true);
        }
        Ok(self.find_service_provider_by_email(email).await?.is_some())
    }
}

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_user_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, phone_number, role, status,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_service_provider_by_email(
        &self,
        email: &str,
    ) -> DatabaseResult<Option<ServiceProvider>> {
        let provider = sqlx::query_as::<_, ServiceProvider>(
            r#"
            SELECT id, name, email, password_hash, phone_number, state, district, status,
                   created_at, updated_at
            FROM service_providers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(provider)
    }

    async fn create_user(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new {} account: {}", new_user.role, new_user.email);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, phone_number, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, phone_number, role, status,
                      created_at, updated_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.phone_number)
        .bind(new_user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_service_provider(
        &self,
        new_provider: &NewServiceProvider,
    ) -> DatabaseResult<ServiceProvider> {
        info!("Creating new service provider: {}", new_provider.email);

        let mut tx = self.pool.begin().await.map_err(DatabaseError::Connection)?;

        let provider = sqlx::query_as::<_, ServiceProvider>(
            r#"
            INSERT INTO service_providers
                (name, email, password_hash, phone_number, state, district, availability)
            VALUES ($1, $2, $3, $4, $5, $6, '{}'::jsonb)
            RETURNING id, name, email, password_hash, phone_number, state, district, status,
                      created_at, updated_at
            "#,
        )
        .bind(&new_provider.name)
        .bind(&new_provider.email)
        .bind(&new_provider.password_hash)
        .bind(&new_provider.phone_number)
        .bind(&new_provider.state)
        .bind(&new_provider.district)
        .fetch_one(&mut *tx)
        .await?;

        // Rows from one statement share NOW(); step the stamp by the list
        // position so services keep the order they were given in.
        if !new_provider.services.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO services (name, service_provider_id, created_at)
                SELECT svc.name, $2, NOW() + svc.ord * INTERVAL '1 microsecond'
                FROM UNNEST($1::text[]) WITH ORDINALITY AS svc (name, ord)
                "#,
            )
            .bind(&new_provider.services)
            .bind(provider.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool, run_migrations};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_provider_services_keep_their_order() {
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("DATABASE_URL not set, skipping account store test");
            return;
        }

        let pool = init_pool(&DatabaseConfig::from_env().unwrap()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = PgAccountStore::new(pool.clone());

        let services = vec![
            "Zoning Surveys".to_string(),
            "Aerial Photography".to_string(),
            "Mapping".to_string(),
        ];
        let provider = store
            .create_service_provider(&NewServiceProvider {
                name: "Ordering Check".to_string(),
                email: format!("ordering-{}@example.com", Uuid::new_v4()),
                password_hash: "x".to_string(),
                phone_number: "987-654-0000".to_string(),
                state: "Texas".to_string(),
                district: "Austin".to_string(),
                services: services.clone(),
            })
            .await
            .unwrap();

        let stored: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM services WHERE service_provider_id = $1 ORDER BY created_at, id",
        )
        .bind(provider.id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(stored, services);

        sqlx::query("DELETE FROM service_providers WHERE id = $1")
            .bind(provider.id)
            .execute(&pool)
            .await
            .unwrap();
    }
}
