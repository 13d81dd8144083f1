//! Admin console queries

use common::{account::AccountStatus, error::DatabaseResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    AccountCounts, AdminServiceProvider, AdminUser, ContactClickPoint, RegistrationPoint,
};

/// Which of the two account tables an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTable {
    Users,
    ServiceProviders,
}

impl AccountTable {
    fn name(&self) -> &'static str {
        match self {
            AccountTable::Users => "users",
            AccountTable::ServiceProviders => "service_providers",
        }
    }
}

/// Admin repository for database operations
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    /// Create a new admin repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_users(&self) -> DatabaseResult<Vec<AdminUser>> {
        let users = sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, name, email, role, status
            FROM users
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn list_service_providers(&self) -> DatabaseResult<Vec<AdminServiceProvider>> {
        let providers = sqlx::query_as::<_, AdminServiceProvider>(
            r#"
            SELECT sp.id, sp.name, sp.email, sp.status,
                   COALESCE(
                       (SELECT array_agg(s.name ORDER BY s.created_at, s.id)
                        FROM services s
                        WHERE s.service_provider_id = sp.id),
                       ARRAY[]::text[]
                   ) AS services
            FROM service_providers sp
            ORDER BY sp.created_at DESC, sp.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(providers)
    }

    /// Set an account's status; false when the id is unknown
    pub async fn set_status(
        &self,
        table: AccountTable,
        id: Uuid,
        status: AccountStatus,
    ) -> DatabaseResult<bool> {
        let sql = format!(
            "UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2",
            table.name()
        );
        let result = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        let changed = result.rows_affected() > 0;
        if changed {
            info!(table = table.name(), account_id = %id, status = %status, "Account status changed");
        }
        Ok(changed)
    }

    /// Delete an account; a provider's services and images go with it
    pub async fn delete(&self, table: AccountTable, id: Uuid) -> DatabaseResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(table = table.name(), account_id = %id, "Account deleted");
        }
        Ok(deleted)
    }

    /// New users and service providers per calendar day
    pub async fn registration_data(&self) -> DatabaseResult<Vec<RegistrationPoint>> {
        let points = sqlx::query_as::<_, RegistrationPoint>(
            r#"
            WITH signups AS (
                SELECT created_at::date AS date, 1 AS users, 0 AS service_providers
                FROM users
                WHERE role = 'USER'
                UNION ALL
                SELECT created_at::date AS date, 0 AS users, 1 AS service_providers
                FROM service_providers
            )
            SELECT date,
                   SUM(users)::bigint AS users,
                   SUM(service_providers)::bigint AS service_providers
            FROM signups
            GROUP BY date
            ORDER BY date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    /// Contact clicks per provider, busiest first
    pub async fn contact_click_data(&self) -> DatabaseResult<Vec<ContactClickPoint>> {
        let points = sqlx::query_as::<_, ContactClickPoint>(
            r#"
            SELECT name AS service_provider, contact_clicks AS clicks
            FROM service_providers
            ORDER BY contact_clicks DESC, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    pub async fn account_counts(&self) -> DatabaseResult<AccountCounts> {
        let counts = sqlx::query_as::<_, AccountCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE role = 'USER') AS users,
                (SELECT COUNT(*) FROM users WHERE role = 'ADMIN') AS admins,
                (SELECT COUNT(*) FROM service_providers) AS service_providers
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
