use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::events::models::{Event, EventPatch};
use crate::features::registrations::models::{Registration, RegistrationPatch};
use crate::features::users::models::User;
use crate::storage::{
    EventStore, RegistrationStore, StoreError, StoreResult, UserStore,
};

const EVENT_COLUMNS: &str =
    "id, organizer_email, title, event_date, registration_count, metadata, created_at, updated_at";

const REGISTRATION_COLUMNS: &str =
    "id, event_id, applicant_email, event_title, details, created_at, updated_at";

const USER_COLUMNS: &str = "id, email, name, photo_url, profile, created_at";

/// Postgres-backed store. Every call is wrapped in a bounded timeout so a
/// wedged database turns into a 503 instead of a hung request.
pub struct PgStore {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.op_timeout)),
        }
    }
}

/// Escape LIKE wildcards so a search term matches literally; without this a
/// needle containing `%` would match every row.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl EventStore for PgStore {
    async fn insert(&self, event: &Event) -> StoreResult<()> {
        self.bounded(async {
            sqlx::query(
                "INSERT INTO events \
                 (id, organizer_email, title, event_date, registration_count, metadata, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(event.id)
            .bind(&event.organizer_email)
            .bind(&event.title)
            .bind(event.event_date)
            .bind(event.registration_count)
            .bind(&event.metadata)
            .bind(event.created_at)
            .bind(event.updated_at)
            .execute(&self.pool)
            .await
            .map(|_| ())
        })
        .await
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Event>> {
        self.bounded(
            sqlx::query_as::<_, Event>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn list(&self, newest_first: bool) -> StoreResult<Vec<Event>> {
        let order = if newest_first { "DESC" } else { "ASC" };
        self.bounded(
            sqlx::query_as::<_, Event>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at {order}"
            ))
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn home_feed(&self, limit: i64) -> StoreResult<Vec<Event>> {
        self.bounded(
            sqlx::query_as::<_, Event>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at ASC LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn list_by_organizer(&self, email: &str) -> StoreResult<Vec<Event>> {
        self.bounded(
            sqlx::query_as::<_, Event>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events \
                 WHERE organizer_email = $1 ORDER BY created_at DESC"
            ))
            .bind(email)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn merge(
        &self,
        id: Uuid,
        owner_email: &str,
        patch: EventPatch,
        upsert: bool,
    ) -> StoreResult<Option<Event>> {
        let metadata_patch = patch.metadata.map(Value::Object);
        self.bounded(async {
            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query_as::<_, Event>(&format!(
                "UPDATE events SET \
                 title = COALESCE($2, title), \
                 event_date = COALESCE($3, event_date), \
                 metadata = metadata || COALESCE($4, '{{}}'::jsonb), \
                 updated_at = now() \
                 WHERE id = $1 \
                 RETURNING {EVENT_COLUMNS}"
            ))
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.event_date)
            .bind(metadata_patch.as_ref())
            .fetch_optional(&mut *tx)
            .await?;

            let event = match updated {
                Some(event) => Some(event),
                None if upsert => Some(
                    sqlx::query_as::<_, Event>(&format!(
                        "INSERT INTO events \
                         (id, organizer_email, title, event_date, registration_count, metadata) \
                         VALUES ($1, $2, COALESCE($3, ''), $4, 0, COALESCE($5, '{{}}'::jsonb)) \
                         RETURNING {EVENT_COLUMNS}"
                    ))
                    .bind(id)
                    .bind(owner_email)
                    .bind(patch.title.as_deref())
                    .bind(patch.event_date)
                    .bind(metadata_patch.as_ref())
                    .fetch_one(&mut *tx)
                    .await?,
                ),
                None => None,
            };

            tx.commit().await?;
            Ok(event)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<u64> {
        self.bounded(async {
            sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map(|r| r.rows_affected())
        })
        .await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.bounded(
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        self.bounded(async {
            sqlx::query(
                "INSERT INTO users (id, email, name, photo_url, profile, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(user.name.as_deref())
            .bind(user.photo_url.as_deref())
            .bind(&user.profile)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map(|_| ())
        })
        .await
    }
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn find(&self, id: Uuid) -> StoreResult<Option<Registration>> {
        self.bounded(
            sqlx::query_as::<_, Registration>(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_applicant_and_event(
        &self,
        applicant_email: &str,
        event_id: Uuid,
    ) -> StoreResult<Option<Registration>> {
        self.bounded(
            sqlx::query_as::<_, Registration>(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations \
                 WHERE applicant_email = $1 AND event_id = $2"
            ))
            .bind(applicant_email)
            .bind(event_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn register(&self, registration: &Registration) -> StoreResult<()> {
        // One transaction: the counter never drifts from the inserted rows.
        self.bounded(async {
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                "INSERT INTO registrations \
                 (id, event_id, applicant_email, event_title, details, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(registration.id)
            .bind(registration.event_id)
            .bind(&registration.applicant_email)
            .bind(&registration.event_title)
            .bind(&registration.details)
            .bind(registration.created_at)
            .bind(registration.updated_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE events SET registration_count = registration_count + 1, \
                 updated_at = now() WHERE id = $1",
            )
            .bind(registration.event_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    async fn list_by_applicant(
        &self,
        applicant_email: &str,
        title_search: Option<&str>,
    ) -> StoreResult<Vec<Registration>> {
        let needle = title_search.map(escape_like);
        self.bounded(
            sqlx::query_as::<_, Registration>(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations \
                 WHERE applicant_email = $1 \
                 AND ($2::text IS NULL OR event_title ILIKE '%' || $2 || '%') \
                 ORDER BY created_at ASC"
            ))
            .bind(applicant_email)
            .bind(needle)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn merge(
        &self,
        id: Uuid,
        applicant_email: &str,
        patch: RegistrationPatch,
        upsert: bool,
    ) -> StoreResult<Option<Registration>> {
        let details_patch = patch.details.map(Value::Object);
        self.bounded(async {
            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query_as::<_, Registration>(&format!(
                "UPDATE registrations SET \
                 event_id = COALESCE($2, event_id), \
                 event_title = COALESCE($3, event_title), \
                 details = details || COALESCE($4, '{{}}'::jsonb), \
                 updated_at = now() \
                 WHERE id = $1 \
                 RETURNING {REGISTRATION_COLUMNS}"
            ))
            .bind(id)
            .bind(patch.event_id)
            .bind(patch.event_title.as_deref())
            .bind(details_patch.as_ref())
            .fetch_optional(&mut *tx)
            .await?;

            let registration = match updated {
                Some(registration) => Some(registration),
                // An upsert without an event reference records a nil event
                // id; referential integrity is not enforced at this layer.
                None if upsert => Some(
                    sqlx::query_as::<_, Registration>(&format!(
                        "INSERT INTO registrations \
                         (id, event_id, applicant_email, event_title, details) \
                         VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, '{{}}'::jsonb)) \
                         RETURNING {REGISTRATION_COLUMNS}"
                    ))
                    .bind(id)
                    .bind(patch.event_id.unwrap_or_else(Uuid::nil))
                    .bind(applicant_email)
                    .bind(patch.event_title.as_deref())
                    .bind(details_patch.as_ref())
                    .fetch_one(&mut *tx)
                    .await?,
                ),
                None => None,
            };

            tx.commit().await?;
            Ok(registration)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<u64> {
        self.bounded(async {
            sqlx::query("DELETE FROM registrations WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map(|r| r.rows_affected())
        })
        .await
    }
}
