//! Services and images owned by a provider
//!
//! Every query is scoped to the owning provider, so a provider can never
//! read or change another provider's rows.

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{Image, Service};

/// Catalog repository for database operations
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Services of a provider, oldest first
    pub async fn list_services(&self, provider_id: Uuid) -> DatabaseResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, service_provider_id, created_at
            FROM services
            WHERE service_provider_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    pub async fn create_service(&self, provider_id: Uuid, name: &str) -> DatabaseResult<Service> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (name, service_provider_id)
            VALUES ($1, $2)
            RETURNING id, name, service_provider_id, created_at
            "#,
        )
        .bind(name)
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;

        info!(provider_id = %provider_id, service_id = %service.id, "Service created");
        Ok(service)
    }

    /// Rename a service; returns the number of rows touched
    pub async fn rename_service(
        &self,
        provider_id: Uuid,
        service_id: Uuid,
        name: &str,
    ) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE services
            SET name = $1
            WHERE id = $2 AND service_provider_id = $3
            "#,
        )
        .bind(name)
        .bind(service_id)
        .bind(provider_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_service(&self, provider_id: Uuid, service_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM services
            WHERE id = $1 AND service_provider_id = $2
            "#,
        )
        .bind(service_id)
        .bind(provider_id)
        .execute(&self.pool)
        .await?;

        info!(
            provider_id = %provider_id,
            service_id = %service_id,
            deleted = result.rows_affected(),
            "Service delete"
        );
        Ok(result.rows_affected())
    }

    /// Images of a provider, newest first
    pub async fn list_images(&self, provider_id: Uuid) -> DatabaseResult<Vec<Image>> {
        let images = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, url, service_provider_id, created_at
            FROM images
            WHERE service_provider_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    pub async fn add_image(&self, provider_id: Uuid, url: &str) -> DatabaseResult<Image> {
        let image = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (url, service_provider_id)
            VALUES ($1, $2)
            RETURNING id, url, service_provider_id, created_at
            "#,
        )
        .bind(url)
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;

        info!(provider_id = %provider_id, image_id = %image.id, "Image added");
        Ok(image)
    }
}
