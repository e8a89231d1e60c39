use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::AuthenticatedUser;
use crate::features::events::dtos::{
    CreateEventDto, EventListQuery, EventResponseDto, UpdateEventDto,
};
use crate::features::events::services::EventService;
use crate::shared::constants::UNAUTHORIZED_MESSAGE;
use crate::shared::types::{ApiResponse, Meta};

/// Create an event owned by the authenticated organizer
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventDto,
    responses(
        (status = 200, description = "Event created", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "events"
)]
pub async fn create_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    AppJson(dto): AppJson<CreateEventDto>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = service.create(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(event), None, None)))
}

/// First six events for the public homepage
#[utoipa::path(
    get,
    path = "/events/home",
    responses(
        (status = 200, description = "Homepage events", body = ApiResponse<Vec<EventResponseDto>>)
    ),
    tag = "events"
)]
pub async fn home_feed(
    State(service): State<Arc<EventService>>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let events = service.home_feed().await?;
    let total = events.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(events),
        None,
        Some(Meta { total }),
    )))
}

/// List all events, optionally newest first
#[utoipa::path(
    get,
    path = "/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "All events", body = ApiResponse<Vec<EventResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "events"
)]
pub async fn list_events(
    _user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let events = service.list(query.sort.is_some()).await?;
    let total = events.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(events),
        None,
        Some(Meta { total }),
    )))
}

/// Fetch one event by id
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<EventResponseDto>),
        (status = 404, description = "Event not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "events"
)]
pub async fn get_event(
    _user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(event), None, None)))
}

/// Partial update of an event (upsert behavior is a deployment knob)
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventResponseDto>),
        (status = 404, description = "Event not found (upsert disabled)"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "events"
)]
pub async fn update_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateEventDto>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(event), None, None)))
}

/// Delete an event; removing an absent id succeeds
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted (or already absent)"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "events"
)]
pub async fn delete_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        None,
        Some(Meta {
            total: deleted as i64,
        }),
    )))
}

/// Events organized by the given email; owner-scoped
#[utoipa::path(
    get,
    path = "/events/by-owner/{email}",
    params(("email" = String, Path, description = "Organizer email")),
    responses(
        (status = 200, description = "Events for this organizer", body = ApiResponse<Vec<EventResponseDto>>),
        (status = 401, description = "Authenticated identity does not match the path")
    ),
    security(("cookie_auth" = [])),
    tag = "events"
)]
pub async fn events_by_owner(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    if !user.owns(&email) {
        return Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()));
    }

    let events = service.list_by_organizer(&email).await?;
    let total = events.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(events),
        None,
        Some(Meta { total }),
    )))
}
