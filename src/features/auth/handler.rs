use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dto::SessionRequestDto;
use crate::features::auth::service::TokenService;
use crate::shared::types::ApiResponse;

/// Issue a session cookie from a submitted identity claim
#[utoipa::path(
    post,
    path = "/session",
    request_body = SessionRequestDto,
    responses(
        (status = 200, description = "Session cookie issued"),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn create_session(
    State(tokens): State<Arc<TokenService>>,
    jar: CookieJar,
    AppJson(dto): AppJson<SessionRequestDto>,
) -> Result<(CookieJar, Json<ApiResponse<()>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = tokens.issue(&dto.email)?;
    tracing::info!("Session issued: email={}", dto.email);

    Ok((
        jar.add(tokens.session_cookie(token)),
        Json(ApiResponse::success(None, None, None)),
    ))
}

/// Clear the session cookie
#[utoipa::path(
    get,
    path = "/session/logout",
    responses(
        (status = 200, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(tokens): State<Arc<TokenService>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<()>>)> {
    Ok((
        jar.add(tokens.clear_cookie()),
        Json(ApiResponse::success(None, None, None)),
    ))
}
