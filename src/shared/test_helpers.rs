use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::core::config::AuthConfig;
use crate::core::middleware;
use crate::features::auth::{routes as auth_routes, TokenService};
use crate::features::events::{routes as events_routes, EventService};
use crate::features::registrations::{routes as registrations_routes, RegistrationService};
use crate::features::users::{routes as users_routes, UserService};
use crate::storage::memory::MemoryStore;

pub fn test_token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        &AuthConfig {
            secret: "test-secret-key".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        },
        false,
    ))
}

/// `Cookie` header value carrying a freshly issued session for `email`
pub fn session_cookie_header(tokens: &TokenService, email: &str) -> String {
    let token = tokens.issue(email).unwrap();
    format!("token={}", token)
}

/// Full application router backed by the in-memory store, with the real auth
/// middleware in front of the protected tree. Mirrors the assembly in main.
pub fn test_app(tokens: Arc<TokenService>) -> Router {
    let store = Arc::new(MemoryStore::new());
    let event_service = Arc::new(EventService::new(store.clone(), true));
    let user_service = Arc::new(UserService::new(store.clone()));
    let registration_service = Arc::new(RegistrationService::new(store.clone(), true));

    let protected = Router::new()
        .merge(events_routes::routes(Arc::clone(&event_service)))
        .merge(registrations_routes::routes(registration_service))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&tokens),
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(protected)
        .merge(auth_routes::routes(tokens))
        .merge(users_routes::routes(user_service))
        .merge(events_routes::public_routes(event_service))
}
