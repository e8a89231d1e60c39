use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Request DTO for creating an event. The organizer is taken from the
/// authenticated session, never from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub event_date: Option<NaiveDate>,

    /// Arbitrary organizer-supplied metadata (distance, location, ...)
    #[schema(value_type = Object)]
    pub metadata: Option<Map<String, Value>>,
}

/// Partial update; omitted fields keep their stored values, metadata entries
/// merge into the stored object.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    pub event_date: Option<NaiveDate>,

    #[schema(value_type = Object)]
    pub metadata: Option<Map<String, Value>>,
}

/// Query parameters for the event list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EventListQuery {
    /// Any value sorts by creation timestamp, newest first
    pub sort: Option<String>,
}

/// Response DTO for an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponseDto {
    pub id: Uuid,
    pub organizer_email: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    pub registration_count: i64,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
