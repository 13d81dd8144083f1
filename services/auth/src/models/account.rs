//! The two account variants behind a single login

use common::{account::AccountStatus, role::Role};
use uuid::Uuid;

use super::{ServiceProvider, User};

/// An account found in one of the two disjoint stores
#[derive(Debug, Clone)]
pub enum Account {
    User(User),
    ServiceProvider(ServiceProvider),
}

impl Account {
    pub fn id(&self) -> Uuid {
        match self {
            Account::User(user) => user.id,
            Account::ServiceProvider(provider) => provider.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Account::User(user) => &user.email,
            Account::ServiceProvider(provider) => &provider.email,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Account::User(user) => &user.name,
            Account::ServiceProvider(provider) => &provider.name,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Account::User(user) => &user.password_hash,
            Account::ServiceProvider(provider) => &provider.password_hash,
        }
    }

    pub fn status(&self) -> AccountStatus {
        match self {
            Account::User(user) => user.status,
            Account::ServiceProvider(provider) => provider.status,
        }
    }

    /// Role implied by the store the account lives in
    ///
    /// Users carry their own `USER`/`ADMIN` tag; every service provider is
    /// `SERVICE_PROVIDER`.
    pub fn role(&self) -> Role {
        match self {
            Account::User(user) => user.role,
            Account::ServiceProvider(_) => Role::ServiceProvider,
        }
    }
}
