//! In-memory account store for tests

use async_trait::async_trait;
use chrono::Utc;
use common::{account::AccountStatus, error::DatabaseResult};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::AccountStore;
use crate::models::{NewServiceProvider, NewUser, ServiceProvider, User};

#[derive(Default)]
pub struct MemoryAccountStore {
    users: Mutex<HashMap<String, User>>,
    providers: Mutex<HashMap<String, ServiceProvider>>,
    services: Mutex<HashMap<Uuid, Vec<String>>>,
}

impl MemoryAccountStore {
    pub fn set_user_status(&self, email: &str, status: AccountStatus) {
        if let Some(user) = self.users.lock().unwrap().get_mut(email) {
            user.status = status;
        }
    }

    pub fn services_of(&self, provider_id: Uuid) -> Vec<String> {
        self.services
            .lock()
            .unwrap()
            .get(&provider_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.lock().unwrap().len()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_user_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn find_service_provider_by_email(
        &self,
        email: &str,
    ) -> DatabaseResult<Option<ServiceProvider>> {
        Ok(self.providers.lock().unwrap().get(email).cloned())
    }

    async fn create_user(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            phone_number: new_user.phone_number.clone(),
            role: new_user.role,
            status: AccountStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users
            .lock()
            .unwrap()
            .insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn create_service_provider(
        &self,
        new_provider: &NewServiceProvider,
    ) -> DatabaseResult<ServiceProvider> {
        let provider = ServiceProvider {
            id: Uuid::new_v4(),
            name: new_provider.name.clone(),
            email: new_provider.email.clone(),
            password_hash: new_provider.password_hash.clone(),
            phone_number: new_provider.phone_number.clone(),
            state: new_provider.state.clone(),
            district: new_provider.district.clone(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.services
            .lock()
            .unwrap()
            .insert(provider.id, new_provider.services.clone());
        self.providers
            .lock()
            .unwrap()
            .insert(provider.email.clone(), provider.clone());
        Ok(provider)
    }
}
