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
use crate::features::registrations::dtos::{
    CreateRegistrationDto, RegistrationListQuery, RegistrationResponseDto, UpdateRegistrationDto,
};
use crate::features::registrations::services::RegistrationService;
use crate::shared::constants::UNAUTHORIZED_MESSAGE;
use crate::shared::types::{ApiResponse, Meta};

/// Register the authenticated user for an event
#[utoipa::path(
    post,
    path = "/registrations",
    request_body = CreateRegistrationDto,
    responses(
        (status = 200, description = "Registration created", body = ApiResponse<RegistrationResponseDto>),
        (status = 400, description = "Validation error or already registered"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "registrations"
)]
pub async fn create_registration(
    user: AuthenticatedUser,
    State(service): State<Arc<RegistrationService>>,
    AppJson(dto): AppJson<CreateRegistrationDto>,
) -> Result<Json<ApiResponse<RegistrationResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let registration = service.register(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(registration), None, None)))
}

/// Registrations for the given applicant; owner-scoped, searchable by title
#[utoipa::path(
    get,
    path = "/registrations/by-applicant/{email}",
    params(
        ("email" = String, Path, description = "Applicant email"),
        RegistrationListQuery
    ),
    responses(
        (status = 200, description = "Registrations for this applicant", body = ApiResponse<Vec<RegistrationResponseDto>>),
        (status = 401, description = "Authenticated identity does not match the path")
    ),
    security(("cookie_auth" = [])),
    tag = "registrations"
)]
pub async fn registrations_by_applicant(
    user: AuthenticatedUser,
    State(service): State<Arc<RegistrationService>>,
    Path(email): Path<String>,
    Query(query): Query<RegistrationListQuery>,
) -> Result<Json<ApiResponse<Vec<RegistrationResponseDto>>>> {
    if !user.owns(&email) {
        return Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()));
    }

    let registrations = service
        .list_by_applicant(&email, query.search.as_deref())
        .await?;
    let total = registrations.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(registrations),
        None,
        Some(Meta { total }),
    )))
}

/// Fetch one registration by id
#[utoipa::path(
    get,
    path = "/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration found", body = ApiResponse<RegistrationResponseDto>),
        (status = 404, description = "Registration not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "registrations"
)]
pub async fn get_registration(
    _user: AuthenticatedUser,
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RegistrationResponseDto>>> {
    let registration = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(registration), None, None)))
}

/// Partial update of a registration (upsert behavior is a deployment knob)
#[utoipa::path(
    put,
    path = "/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    request_body = UpdateRegistrationDto,
    responses(
        (status = 200, description = "Registration updated", body = ApiResponse<RegistrationResponseDto>),
        (status = 404, description = "Registration not found (upsert disabled)"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "registrations"
)]
pub async fn update_registration(
    user: AuthenticatedUser,
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateRegistrationDto>,
) -> Result<Json<ApiResponse<RegistrationResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let registration = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(registration), None, None)))
}

/// Withdraw a registration; removing an absent id succeeds
#[utoipa::path(
    delete,
    path = "/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration deleted (or already absent)"),
        (status = 401, description = "Unauthorized")
    ),
    security(("cookie_auth" = [])),
    tag = "registrations"
)]
pub async fn delete_registration(
    user: AuthenticatedUser,
    State(service): State<Arc<RegistrationService>>,
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
