//! In-memory store used as a test double for [`PgStore`].
//!
//! Keys are UUID v7, so the BTreeMap iteration order matches insertion
//! (creation) order the way a real collection scan would.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::features::events::models::{Event, EventPatch};
use crate::features::registrations::models::{Registration, RegistrationPatch};
use crate::features::users::models::User;
use crate::storage::{
    EventStore, RegistrationStore, StoreError, StoreResult, UserStore,
};

#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<BTreeMap<Uuid, Event>>,
    users: RwLock<BTreeMap<Uuid, User>>,
    registrations: RwLock<BTreeMap<Uuid, Registration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn merge_object(target: &mut Value, patch: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Some(object) = target.as_object_mut() {
        object.extend(patch);
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert(&self, event: &Event) -> StoreResult<()> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list(&self, newest_first: bool) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        if newest_first {
            events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(events)
    }

    async fn home_feed(&self, limit: i64) -> StoreResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .await
            .values()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_by_organizer(&self, email: &str) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .values()
            .filter(|e| e.organizer_email == email)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn merge(
        &self,
        id: Uuid,
        owner_email: &str,
        patch: EventPatch,
        upsert: bool,
    ) -> StoreResult<Option<Event>> {
        let mut events = self.events.write().await;
        if let Some(event) = events.get_mut(&id) {
            if let Some(title) = patch.title {
                event.title = title;
            }
            if let Some(event_date) = patch.event_date {
                event.event_date = Some(event_date);
            }
            if let Some(metadata) = patch.metadata {
                merge_object(&mut event.metadata, metadata);
            }
            event.updated_at = Utc::now();
            return Ok(Some(event.clone()));
        }
        if !upsert {
            return Ok(None);
        }
        let now = Utc::now();
        let event = Event {
            id,
            organizer_email: owner_email.to_string(),
            title: patch.title.unwrap_or_default(),
            event_date: patch.event_date,
            registration_count: 0,
            metadata: Value::Object(patch.metadata.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };
        events.insert(id, event.clone());
        Ok(Some(event))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<u64> {
        Ok(u64::from(self.events.write().await.remove(&id).is_some()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn find(&self, id: Uuid) -> StoreResult<Option<Registration>> {
        Ok(self.registrations.read().await.get(&id).cloned())
    }

    async fn find_by_applicant_and_event(
        &self,
        applicant_email: &str,
        event_id: Uuid,
    ) -> StoreResult<Option<Registration>> {
        Ok(self
            .registrations
            .read()
            .await
            .values()
            .find(|r| r.applicant_email == applicant_email && r.event_id == event_id)
            .cloned())
    }

    async fn register(&self, registration: &Registration) -> StoreResult<()> {
        let mut registrations = self.registrations.write().await;
        let mut events = self.events.write().await;

        let duplicate = registrations.values().any(|r| {
            r.applicant_email == registration.applicant_email
                && r.event_id == registration.event_id
        });
        if duplicate {
            return Err(StoreError::DuplicateKey);
        }

        registrations.insert(registration.id, registration.clone());
        if let Some(event) = events.get_mut(&registration.event_id) {
            event.registration_count += 1;
            event.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_by_applicant(
        &self,
        applicant_email: &str,
        title_search: Option<&str>,
    ) -> StoreResult<Vec<Registration>> {
        let needle = title_search.map(str::to_lowercase);
        Ok(self
            .registrations
            .read()
            .await
            .values()
            .filter(|r| r.applicant_email == applicant_email)
            .filter(|r| match &needle {
                Some(needle) => r.event_title.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn merge(
        &self,
        id: Uuid,
        applicant_email: &str,
        patch: RegistrationPatch,
        upsert: bool,
    ) -> StoreResult<Option<Registration>> {
        let mut registrations = self.registrations.write().await;
        if let Some(registration) = registrations.get_mut(&id) {
            if let Some(event_id) = patch.event_id {
                registration.event_id = event_id;
            }
            if let Some(event_title) = patch.event_title {
                registration.event_title = event_title;
            }
            if let Some(details) = patch.details {
                merge_object(&mut registration.details, details);
            }
            registration.updated_at = Utc::now();
            return Ok(Some(registration.clone()));
        }
        if !upsert {
            return Ok(None);
        }
        let now = Utc::now();
        let registration = Registration {
            id,
            event_id: patch.event_id.unwrap_or_else(Uuid::nil),
            applicant_email: applicant_email.to_string(),
            event_title: patch.event_title.unwrap_or_default(),
            details: Value::Object(patch.details.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };
        registrations.insert(id, registration.clone());
        Ok(Some(registration))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<u64> {
        Ok(u64::from(
            self.registrations.write().await.remove(&id).is_some(),
        ))
    }
}
