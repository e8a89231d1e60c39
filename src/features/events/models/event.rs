use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::events::dtos::EventResponseDto;

/// Stored event record. `metadata` is a free-form JSON object for whatever
/// the organizer attaches (distance, location, banner image, ...).
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_email: String,
    pub title: String,
    pub event_date: Option<NaiveDate>,
    pub registration_count: i64,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for an event. `None` leaves the stored value untouched;
/// supplied `metadata` entries are merged into the stored object.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub metadata: Option<Map<String, Value>>,
}

impl From<Event> for EventResponseDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            organizer_email: e.organizer_email,
            title: e.title,
            event_date: e.event_date,
            registration_count: e.registration_count,
            metadata: e.metadata,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
