//! Repositories for database operations

pub mod accounts;
#[cfg(test)]
pub mod memory;

pub use accounts::{AccountStore, PgAccountStore};
