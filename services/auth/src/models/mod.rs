//! Authentication service models

pub mod account;
pub mod service_provider;
pub mod user;

// Re-export for convenience
pub use account::Account;
pub use service_provider::{NewServiceProvider, ServiceProvider};
pub use user::{LoginCredentials, NewUser, User};
