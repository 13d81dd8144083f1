//! Application state shared across handlers

use common::session::SessionTokens;
use sqlx::PgPool;

use crate::repositories::{AdminRepository, CatalogRepository, ProviderRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session_tokens: SessionTokens,
    pub provider_repository: ProviderRepository,
    pub catalog_repository: CatalogRepository,
    pub admin_repository: AdminRepository,
}

impl AppState {
    pub fn new(pool: PgPool, session_tokens: SessionTokens) -> Self {
        Self {
            session_tokens,
            provider_repository: ProviderRepository::new(pool.clone()),
            catalog_repository: CatalogRepository::new(pool.clone()),
            admin_repository: AdminRepository::new(pool),
        }
    }
}
