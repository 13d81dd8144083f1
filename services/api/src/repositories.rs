//! Repositories for database operations

pub mod admin;
pub mod catalog;
pub mod providers;

pub use admin::AdminRepository;
pub use catalog::CatalogRepository;
pub use providers::ProviderRepository;
