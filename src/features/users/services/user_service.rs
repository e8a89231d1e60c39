use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreateUserDto, UserResponseDto};
use crate::features::users::models::User;
use crate::storage::{StoreError, UserStore};

const DUPLICATE_ACCOUNT_MESSAGE: &str = "You already have an account";

/// Service for user accounts
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create an account once per email. The pre-check gives the friendly
    /// error; the store's unique index closes the check-then-insert race and
    /// a violation maps to the same Conflict.
    pub async fn create(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        if self.store.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_ACCOUNT_MESSAGE.to_string()));
        }

        let user = User {
            id: Uuid::now_v7(),
            email: dto.email,
            name: dto.name,
            photo_url: dto.photo_url,
            profile: Value::Object(dto.profile.unwrap_or_else(Map::new)),
            created_at: Utc::now(),
        };

        match self.store.insert(&user).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey) => {
                return Err(AppError::Conflict(DUPLICATE_ACCOUNT_MESSAGE.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("User created: id={}, email={}", user.id, user.email);
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    fn dto(email: &str) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            name: Some("Test Runner".to_string()),
            photo_url: None,
            profile: None,
        }
    }

    #[tokio::test]
    async fn create_stores_profile_fields() {
        let service = UserService::new(Arc::new(MemoryStore::new()));
        let email: String = SafeEmail().fake();
        let user = service.create(dto(&email)).await.unwrap();
        assert_eq!(user.email, email);
        assert_eq!(user.name.as_deref(), Some("Test Runner"));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_and_inserts_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service = UserService::new(store.clone());

        service.create(dto("runner@example.com")).await.unwrap();
        let err = service.create(dto("runner@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // the first record is still the only one
        let found = store.find_by_email("runner@example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn store_level_duplicate_maps_to_the_same_conflict() {
        // Bypass the pre-check by inserting directly, then go through the
        // service: the unique-key failure must surface as Conflict too.
        let store = Arc::new(MemoryStore::new());
        let service = UserService::new(store.clone());

        let user = User {
            id: Uuid::now_v7(),
            email: "runner@example.com".to_string(),
            name: None,
            photo_url: None,
            profile: Value::Object(Map::new()),
            created_at: Utc::now(),
        };
        store.insert(&user).await.unwrap();

        let err = service.create(dto("runner@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
