use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::AuthenticatedUser;
use crate::features::events::dtos::{CreateEventDto, EventResponseDto, UpdateEventDto};
use crate::features::events::models::{Event, EventPatch};
use crate::shared::constants::{HOME_FEED_LIMIT, UNAUTHORIZED_MESSAGE};
use crate::storage::EventStore;

/// Service for event operations
pub struct EventService {
    store: Arc<dyn EventStore>,
    /// When set, updates of absent ids create the record instead of 404ing.
    upsert_on_update: bool,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>, upsert_on_update: bool) -> Self {
        Self {
            store,
            upsert_on_update,
        }
    }

    pub async fn create(
        &self,
        organizer: &AuthenticatedUser,
        dto: CreateEventDto,
    ) -> Result<EventResponseDto> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::now_v7(),
            organizer_email: organizer.email.clone(),
            title: dto.title,
            event_date: dto.event_date,
            registration_count: 0,
            metadata: Value::Object(dto.metadata.unwrap_or_else(Map::new)),
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&event).await?;

        tracing::info!(
            "Event created: id={}, organizer={}",
            event.id,
            event.organizer_email
        );

        Ok(event.into())
    }

    /// First events in natural order for the public homepage
    pub async fn home_feed(&self) -> Result<Vec<EventResponseDto>> {
        let events = self.store.home_feed(HOME_FEED_LIMIT).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    pub async fn list(&self, newest_first: bool) -> Result<Vec<EventResponseDto>> {
        let events = self.store.list(newest_first).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<EventResponseDto> {
        self.store
            .find(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", id)))
    }

    pub async fn list_by_organizer(&self, email: &str) -> Result<Vec<EventResponseDto>> {
        let events = self.store.list_by_organizer(email).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    /// Partial-field merge; only the owning organizer may touch an existing
    /// event. An absent id either 404s or creates the event owned by the
    /// caller, depending on the upsert knob.
    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateEventDto,
    ) -> Result<EventResponseDto> {
        match self.store.find(id).await? {
            Some(existing) => {
                if !caller.owns(&existing.organizer_email) {
                    return Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()));
                }
            }
            None if !self.upsert_on_update => {
                return Err(AppError::NotFound(format!("Event '{}' not found", id)));
            }
            None => {}
        }

        let patch = EventPatch {
            title: dto.title,
            event_date: dto.event_date,
            metadata: dto.metadata,
        };
        self.store
            .merge(id, &caller.email, patch, self.upsert_on_update)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", id)))
    }

    /// Idempotent delete; removing an absent id succeeds with a zero count
    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<u64> {
        if let Some(existing) = self.store.find(id).await? {
            if !caller.owns(&existing.organizer_email) {
                return Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()));
            }
        }
        let deleted = self.store.delete(id).await?;
        if deleted > 0 {
            tracing::info!("Event deleted: id={}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use serde_json::json;

    fn organizer() -> AuthenticatedUser {
        AuthenticatedUser {
            email: "organizer@example.com".to_string(),
        }
    }

    fn service(upsert: bool) -> EventService {
        EventService::new(Arc::new(MemoryStore::new()), upsert)
    }

    fn create_dto(title: &str) -> CreateEventDto {
        CreateEventDto {
            title: title.to_string(),
            event_date: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn create_uses_authenticated_identity_as_organizer() {
        let service = service(true);
        let event = service.create(&organizer(), create_dto("City Run")).await.unwrap();
        assert_eq!(event.organizer_email, "organizer@example.com");
        assert_eq!(event.registration_count, 0);
    }

    #[tokio::test]
    async fn get_absent_event_is_not_found() {
        let service = service(true);
        let err = service.get(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn home_feed_caps_at_six_events() {
        let service = service(true);
        for i in 0..8 {
            service
                .create(&organizer(), create_dto(&format!("Run {}", i)))
                .await
                .unwrap();
        }
        let feed = service.home_feed().await.unwrap();
        assert_eq!(feed.len(), 6);
        // natural order: the earliest events come first
        assert_eq!(feed[0].title, "Run 0");
    }

    #[tokio::test]
    async fn list_sorts_newest_first_when_requested() {
        let service = service(true);
        service.create(&organizer(), create_dto("First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        service.create(&organizer(), create_dto("Second")).await.unwrap();

        let sorted = service.list(true).await.unwrap();
        assert_eq!(sorted[0].title, "Second");
        let natural = service.list(false).await.unwrap();
        assert_eq!(natural[0].title, "First");
    }

    #[tokio::test]
    async fn partial_update_preserves_omitted_fields() {
        let service = service(true);
        let created = service
            .create(
                &organizer(),
                CreateEventDto {
                    title: "Trail Run".to_string(),
                    event_date: None,
                    metadata: Some(
                        json!({"distance": "42k", "city": "Oslo"})
                            .as_object()
                            .cloned()
                            .unwrap(),
                    ),
                },
            )
            .await
            .unwrap();

        let updated = service
            .update(
                &organizer(),
                created.id,
                UpdateEventDto {
                    title: None,
                    event_date: None,
                    metadata: Some(json!({"city": "Bergen"}).as_object().cloned().unwrap()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Trail Run");
        assert_eq!(updated.metadata["distance"], "42k");
        assert_eq!(updated.metadata["city"], "Bergen");
    }

    #[tokio::test]
    async fn update_by_non_owner_is_unauthorized() {
        let service = service(true);
        let created = service.create(&organizer(), create_dto("City Run")).await.unwrap();

        let stranger = AuthenticatedUser {
            email: "someone@example.com".to_string(),
        };
        let err = service
            .update(
                &stranger,
                created.id,
                UpdateEventDto {
                    title: Some("Hijacked".to_string()),
                    event_date: None,
                    metadata: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn strict_update_of_absent_event_is_not_found() {
        let service = service(false);
        let err = service
            .update(
                &organizer(),
                Uuid::now_v7(),
                UpdateEventDto {
                    title: Some("Ghost".to_string()),
                    event_date: None,
                    metadata: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn upsert_update_creates_absent_event_owned_by_caller() {
        let service = service(true);
        let id = Uuid::now_v7();
        let event = service
            .update(
                &organizer(),
                id,
                UpdateEventDto {
                    title: Some("Night Run".to_string()),
                    event_date: None,
                    metadata: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(event.id, id);
        assert_eq!(event.organizer_email, "organizer@example.com");
        assert_eq!(event.title, "Night Run");
    }

    #[tokio::test]
    async fn delete_absent_event_is_idempotent() {
        let service = service(true);
        let deleted = service.delete(&organizer(), Uuid::now_v7()).await.unwrap();
        assert_eq!(deleted, 0);
    }
}
