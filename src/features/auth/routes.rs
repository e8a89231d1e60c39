use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handler;
use crate::features::auth::service::TokenService;

/// Create routes for the auth feature
///
/// Note: Both endpoints are public; protection of the rest of the API happens
/// in the auth middleware.
pub fn routes(tokens: Arc<TokenService>) -> Router {
    Router::new()
        .route("/session", post(handler::create_session))
        .route("/session/logout", get(handler::logout))
        .with_state(tokens)
}
