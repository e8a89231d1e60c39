use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::AuthenticatedUser;
use crate::features::registrations::dtos::{
    CreateRegistrationDto, RegistrationResponseDto, UpdateRegistrationDto,
};
use crate::features::registrations::models::{Registration, RegistrationPatch};
use crate::shared::constants::UNAUTHORIZED_MESSAGE;
use crate::storage::{RegistrationStore, StoreError};

const DUPLICATE_REGISTRATION_MESSAGE: &str = "You have already registered for this event";

/// Service for registration operations
pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
    /// Same upsert-on-update knob as the events service.
    upsert_on_update: bool,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RegistrationStore>, upsert_on_update: bool) -> Self {
        Self {
            store,
            upsert_on_update,
        }
    }

    /// Register the caller for an event. The insert and the event's
    /// `registration_count` increment commit as one unit; a second
    /// registration for the same event is a Conflict and leaves the counter
    /// untouched.
    pub async fn register(
        &self,
        applicant: &AuthenticatedUser,
        dto: CreateRegistrationDto,
    ) -> Result<RegistrationResponseDto> {
        if self
            .store
            .find_by_applicant_and_event(&applicant.email, dto.event_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                DUPLICATE_REGISTRATION_MESSAGE.to_string(),
            ));
        }

        let now = Utc::now();
        let registration = Registration {
            id: Uuid::now_v7(),
            event_id: dto.event_id,
            applicant_email: applicant.email.clone(),
            event_title: dto.event_title,
            details: Value::Object(dto.details.unwrap_or_else(Map::new)),
            created_at: now,
            updated_at: now,
        };

        match self.store.register(&registration).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey) => {
                return Err(AppError::Conflict(
                    DUPLICATE_REGISTRATION_MESSAGE.to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            "Registration created: id={}, applicant={}, event={}",
            registration.id,
            registration.applicant_email,
            registration.event_id
        );

        Ok(registration.into())
    }

    /// The caller's registrations, optionally filtered by a case-insensitive
    /// title substring.
    pub async fn list_by_applicant(
        &self,
        email: &str,
        search: Option<&str>,
    ) -> Result<Vec<RegistrationResponseDto>> {
        let registrations = self.store.list_by_applicant(email, search).await?;
        Ok(registrations.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<RegistrationResponseDto> {
        self.store
            .find(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Registration '{}' not found", id)))
    }

    /// Partial-field merge; only the registered applicant may touch an
    /// existing record. An absent id either 404s or creates the record for
    /// the caller, depending on the upsert knob.
    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateRegistrationDto,
    ) -> Result<RegistrationResponseDto> {
        match self.store.find(id).await? {
            Some(existing) => {
                if !caller.owns(&existing.applicant_email) {
                    return Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()));
                }
            }
            None if !self.upsert_on_update => {
                return Err(AppError::NotFound(format!(
                    "Registration '{}' not found",
                    id
                )));
            }
            None => {}
        }

        let patch = RegistrationPatch {
            event_id: dto.event_id,
            event_title: dto.event_title,
            details: dto.details,
        };
        self.store
            .merge(id, &caller.email, patch, self.upsert_on_update)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Registration '{}' not found", id)))
    }

    /// Idempotent delete; removing an absent id succeeds with a zero count.
    /// Withdrawing does not decrement the event's counter, matching the
    /// registration flow's one-way tally.
    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<u64> {
        if let Some(existing) = self.store.find(id).await? {
            if !caller.owns(&existing.applicant_email) {
                return Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()));
            }
        }
        let deleted = self.store.delete(id).await?;
        if deleted > 0 {
            tracing::info!("Registration deleted: id={}", id);
        }
        Ok(deleted)
    }
}
