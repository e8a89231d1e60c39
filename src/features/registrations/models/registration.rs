use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::registrations::dtos::RegistrationResponseDto;

/// Stored registration record. `event_title` is denormalized from the event
/// at registration time so the applicant's list can be searched by title
/// without a join. `details` holds free-form applicant data.
#[derive(Debug, Clone, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub applicant_email: String,
    pub event_title: String,
    pub details: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a registration; same merge semantics as `EventPatch`.
#[derive(Debug, Clone, Default)]
pub struct RegistrationPatch {
    pub event_id: Option<Uuid>,
    pub event_title: Option<String>,
    pub details: Option<Map<String, Value>>,
}

impl From<Registration> for RegistrationResponseDto {
    fn from(r: Registration) -> Self {
        Self {
            id: r.id,
            event_id: r.event_id,
            applicant_email: r.applicant_email,
            event_title: r.event_title,
            details: r.details,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
