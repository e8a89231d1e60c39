use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::events::handlers;
use crate::features::events::services::EventService;

/// Public homepage feed; everything else under /events requires a session
pub fn public_routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route("/events/home", get(handlers::home_feed))
        .with_state(service)
}

/// Create routes for the events feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route(
            "/events",
            post(handlers::create_event).get(handlers::list_events),
        )
        .route(
            "/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route("/events/by-owner/{email}", get(handlers::events_by_owner))
        .with_state(service)
}
