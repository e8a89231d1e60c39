use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Request DTO for registering for an event. The applicant is taken from the
/// authenticated session, never from the payload. The title travels with the
/// registration so the applicant's list can be searched without a join.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationDto {
    pub event_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Event title must be 1-255 characters"))]
    pub event_title: String,

    /// Free-form applicant details (contact info, shirt size, ...)
    #[schema(value_type = Object)]
    pub details: Option<Map<String, Value>>,
}

/// Partial update; omitted fields keep their stored values, detail entries
/// merge into the stored object.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationDto {
    pub event_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Event title must be 1-255 characters"))]
    pub event_title: Option<String>,

    #[schema(value_type = Object)]
    pub details: Option<Map<String, Value>>,
}

/// Query parameters for the applicant's registration list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RegistrationListQuery {
    /// Case-insensitive substring match on the event title
    pub search: Option<String>,
}

/// Response DTO for a registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponseDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub applicant_email: String,
    pub event_title: String,
    #[schema(value_type = Object)]
    pub details: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
