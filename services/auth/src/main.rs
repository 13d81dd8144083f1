use anyhow::Result;
use std::sync::Arc;
use tracing::info;

mod credentials;
mod extract;
mod models;
mod password;
mod registration;
mod repositories;
mod routes;
mod seed;
mod validation;

use common::database;
use common::session::{SessionConfig, SessionTokens};
use common::settings::{ServerSettings, seed_enabled};
use tokio::net::TcpListener;

use crate::repositories::{AccountStore, PgAccountStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub session_tokens: SessionTokens,
    pub seed_enabled: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    common::telemetry::init_tracing()?;

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let session_tokens = SessionTokens::new(SessionConfig::from_env()?);

    let app_state = AppState {
        accounts: Arc::new(PgAccountStore::new(pool)),
        session_tokens,
        seed_enabled: seed_enabled(),
    };

    if app_state.seed_enabled {
        info!("Demo data seeding is enabled at /api/seed");
    }

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let settings = ServerSettings::from_env(3000)?;
    let addr = settings.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Authentication service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
