use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::users::dtos::UserResponseDto;

/// Stored user account. Created once per email, never updated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub profile: Value,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            photo_url: u.photo_url,
            profile: u.profile,
            created_at: u.created_at,
        }
    }
}
