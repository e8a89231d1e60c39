//! Storage abstraction for the three record collections.
//!
//! Handlers never touch a connection pool directly; services receive
//! `Arc<dyn ...Store>` trait objects so tests can substitute the in-memory
//! implementation for the Postgres one.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::features::events::models::{Event, EventPatch};
use crate::features::registrations::models::{Registration, RegistrationPatch};
use crate::features::users::models::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("duplicate key")]
    DuplicateKey,

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::DuplicateKey;
            }
        }
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: &Event) -> StoreResult<()>;

    async fn find(&self, id: Uuid) -> StoreResult<Option<Event>>;

    /// All events; `newest_first` orders by creation timestamp descending,
    /// otherwise natural (insertion) order.
    async fn list(&self, newest_first: bool) -> StoreResult<Vec<Event>>;

    /// First `limit` events in natural order, for the public homepage.
    async fn home_feed(&self, limit: i64) -> StoreResult<Vec<Event>>;

    async fn list_by_organizer(&self, email: &str) -> StoreResult<Vec<Event>>;

    /// Partial-field merge. Returns the record after the merge, or `None`
    /// when it is absent and `upsert` is off. With `upsert`, an absent record
    /// is created with `owner_email` as its organizer.
    async fn merge(
        &self,
        id: Uuid,
        owner_email: &str,
        patch: EventPatch,
        upsert: bool,
    ) -> StoreResult<Option<Event>>;

    /// Returns the number of records removed; deleting an absent id is not
    /// an error.
    async fn delete(&self, id: Uuid) -> StoreResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with `DuplicateKey` when the email is already taken: the natural
    /// key is backed by a unique index, closing the check-then-insert race.
    async fn insert(&self, user: &User) -> StoreResult<()>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn find(&self, id: Uuid) -> StoreResult<Option<Registration>>;

    async fn find_by_applicant_and_event(
        &self,
        applicant_email: &str,
        event_id: Uuid,
    ) -> StoreResult<Option<Registration>>;

    /// Inserts the registration and increments the target event's
    /// `registration_count` as one atomic unit. A duplicate
    /// (applicant, event) pair fails with `DuplicateKey` and leaves the
    /// counter untouched.
    async fn register(&self, registration: &Registration) -> StoreResult<()>;

    /// Registrations for one applicant, optionally filtered by a
    /// case-insensitive substring match on the event title.
    async fn list_by_applicant(
        &self,
        applicant_email: &str,
        title_search: Option<&str>,
    ) -> StoreResult<Vec<Registration>>;

    /// Same contract as [`EventStore::merge`]; an upsert-created record gets
    /// `applicant_email` as its applicant.
    async fn merge(
        &self,
        id: Uuid,
        applicant_email: &str,
        patch: RegistrationPatch,
        upsert: bool,
    ) -> StoreResult<Option<Registration>>;

    async fn delete(&self, id: Uuid) -> StoreResult<u64>;
}
