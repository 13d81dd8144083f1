//! Common library for the service marketplace
//!
//! This crate provides shared functionality used by the auth and api
//! services: database connectivity and migrations, error types, the role
//! and account status model, the stateless session token codec, server
//! settings and tracing setup.

pub mod account;
pub mod database;
pub mod error;
pub mod role;
pub mod session;
pub mod settings;
pub mod telemetry;

/// Example usage of the database and session modules
///
/// ```rust,no_run
/// use common::database::{DatabaseConfig, init_pool, health_check};
/// use common::session::{SessionConfig, SessionTokens};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::from_env()?;
///     let pool = init_pool(&config).await?;
///     let is_healthy = health_check(&pool).await?;
///     println!("Database health check: {}", is_healthy);
///
///     let tokens = SessionTokens::new(SessionConfig::from_env()?);
///     println!("Sessions last {} seconds", tokens.max_age());
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
