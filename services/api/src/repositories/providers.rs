//! Provider discovery, profiles and contact clicks

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::discovery::{DiscoveryFilter, ProviderRow, ProviderSummary, build_discovery_query};
use crate::models::{FilterOptions, ServiceProviderProfile};

/// Read side of the service_providers table
#[derive(Clone)]
pub struct ProviderRepository {
    pool: PgPool,
}

impl ProviderRepository {
    /// Create a new provider repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Providers matching every supplied filter
    pub async fn discover(&self, filter: &DiscoveryFilter) -> DatabaseResult<Vec<ProviderSummary>> {
        let rows = build_discovery_query(filter)
            .build_query_as::<ProviderRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ProviderSummary::from).collect())
    }

    /// Distinct service names, states and districts, sorted
    pub async fn filter_options(&self) -> DatabaseResult<FilterOptions> {
        let services = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT name FROM services ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let states = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT state FROM service_providers ORDER BY state",
        )
        .fetch_all(&self.pool)
        .await?;

        let districts = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT district FROM service_providers ORDER BY district",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(FilterOptions {
            services,
            states,
            districts,
        })
    }

    /// Full profile of one provider
    pub async fn profile(&self, id: Uuid) -> DatabaseResult<Option<ServiceProviderProfile>> {
        let profile = sqlx::query_as::<_, ServiceProviderProfile>(
            r#"
            SELECT id, name, email, phone_number, state, district, availability, status,
                   contact_clicks, created_at
            FROM service_providers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Count a contact click and hand back the provider's phone number
    pub async fn record_contact(&self, id: Uuid) -> DatabaseResult<Option<String>> {
        let phone_number = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE service_providers
            SET contact_clicks = contact_clicks + 1
            WHERE id = $1
            RETURNING phone_number
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if phone_number.is_some() {
            info!(provider_id = %id, "Contact click recorded");
        }

        Ok(phone_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool, run_migrations};
    use serial_test::serial;

    async fn insert_provider(pool: &PgPool, tag: &str, state: &str, services: &[&str]) -> Uuid {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO service_providers (name, email, password_hash, phone_number, state, district)
            VALUES ($1, $2, 'x', '987-654-0000', $3, 'Test District')
            RETURNING id
            "#,
        )
        .bind(format!("Discovery {}", tag))
        .bind(format!("discovery-{}-{}@example.com", tag, Uuid::new_v4()))
        .bind(state)
        .fetch_one(pool)
        .await
        .unwrap();

        for service in services {
            sqlx::query("INSERT INTO services (name, service_provider_id) VALUES ($1, $2)")
                .bind(*service)
                .bind(id)
                .execute(pool)
                .await
                .unwrap();
        }
        id
    }

    #[tokio::test]
    #[serial]
    async fn test_each_filter_narrows_discovery() {
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("DATABASE_URL not set, skipping discovery test");
            return;
        }

        let pool = init_pool(&DatabaseConfig::from_env().unwrap()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repository = ProviderRepository::new(pool.clone());

        let state = format!("State {}", Uuid::new_v4());
        let inspector = insert_provider(&pool, "a", &state, &["Inspections"]).await;
        let filmer = insert_provider(&pool, "b", &state, &["Entertainment & Media"]).await;

        let all = repository.discover(&DiscoveryFilter::default()).await.unwrap();
        let all_ids: Vec<Uuid> = all.iter().map(|p| p.id).collect();
        assert!(all_ids.contains(&inspector) && all_ids.contains(&filmer));

        let by_state = repository
            .discover(&DiscoveryFilter {
                state: Some(state.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_state.len(), 2);
        assert!(by_state.len() <= all.len());

        let by_state_and_service = repository
            .discover(&DiscoveryFilter {
                state: Some(state.clone()),
                service: Some("Inspections".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_state_and_service.len(), 1);
        assert_eq!(by_state_and_service[0].id, inspector);
        assert_eq!(by_state_and_service[0].services, vec!["Inspections".to_string()]);

        let phone = repository.record_contact(filmer).await.unwrap();
        assert_eq!(phone.as_deref(), Some("987-654-0000"));
        assert_eq!(repository.record_contact(Uuid::new_v4()).await.unwrap(), None);

        sqlx::query("DELETE FROM service_providers WHERE state = $1")
            .bind(&state)
            .execute(&pool)
            .await
            .unwrap();
    }
}
