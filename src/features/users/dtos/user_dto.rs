use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request DTO for creating a user account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 255, message = "Name must not exceed 255 characters"))]
    pub name: Option<String>,

    #[validate(url(message = "Invalid photo URL"))]
    pub photo_url: Option<String>,

    /// Free-form profile fields
    #[schema(value_type = Object)]
    pub profile: Option<Map<String, Value>>,
}

/// Response DTO for a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[schema(value_type = Object)]
    pub profile: Value,
    pub created_at: DateTime<Utc>,
}
