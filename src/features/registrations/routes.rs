use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::registrations::handlers;
use crate::features::registrations::services::RegistrationService;

/// Create routes for the registrations feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<RegistrationService>) -> Router {
    Router::new()
        .route("/registrations", post(handlers::create_registration))
        .route(
            "/registrations/{id}",
            get(handlers::get_registration)
                .put(handlers::update_registration)
                .delete(handlers::delete_registration),
        )
        .route(
            "/registrations/by-applicant/{email}",
            get(handlers::registrations_by_applicant),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::{session_cookie_header, test_app, test_token_service};

    fn server() -> (TestServer, std::sync::Arc<crate::features::auth::TokenService>) {
        let tokens = test_token_service();
        let server = TestServer::new(test_app(tokens.clone())).unwrap();
        (server, tokens)
    }

    fn cookie(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    async fn create_event(server: &TestServer, session: &str, title: &str) -> String {
        let response = server
            .post("/events")
            .add_header(header::COOKIE, cookie(session))
            .json(&json!({"title": title}))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["data"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn second_registration_is_rejected_and_counter_stays_at_one() {
        let (server, tokens) = server();
        let organizer = session_cookie_header(&tokens, "organizer@example.com");
        let runner = session_cookie_header(&tokens, "runner@example.com");
        let event_id = create_event(&server, &organizer, "City Run").await;

        let first = server
            .post("/registrations")
            .add_header(header::COOKIE, cookie(&runner))
            .json(&json!({"eventId": event_id, "eventTitle": "City Run"}))
            .await;
        first.assert_status_ok();

        let second = server
            .post("/registrations")
            .add_header(header::COOKIE, cookie(&runner))
            .json(&json!({"eventId": event_id, "eventTitle": "City Run"}))
            .await;
        assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(second.json::<Value>()["success"], false);

        let event = server
            .get(&format!("/events/{}", event_id))
            .add_header(header::COOKIE, cookie(&organizer))
            .await;
        assert_eq!(event.json::<Value>()["data"]["registrationCount"], 1);
    }

    #[tokio::test]
    async fn by_applicant_filters_by_title_search() {
        let (server, tokens) = server();
        let organizer = session_cookie_header(&tokens, "organizer@example.com");
        let runner = session_cookie_header(&tokens, "runner@example.com");

        let trail = create_event(&server, &organizer, "Mountain Trail Marathon").await;
        let city = create_event(&server, &organizer, "City Sprint").await;
        for (id, title) in [(trail, "Mountain Trail Marathon"), (city, "City Sprint")] {
            server
                .post("/registrations")
                .add_header(header::COOKIE, cookie(&runner))
                .json(&json!({"eventId": id, "eventTitle": title}))
                .await
                .assert_status_ok();
        }

        let hits = server
            .get("/registrations/by-applicant/runner@example.com")
            .add_query_param("search", "TRAIL")
            .add_header(header::COOKIE, cookie(&runner))
            .await;
        hits.assert_status_ok();
        let body: Value = hits.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(
            body["data"][0]["eventTitle"],
            "Mountain Trail Marathon"
        );
    }

    #[tokio::test]
    async fn by_applicant_rejects_a_mismatched_path_email() {
        let (server, tokens) = server();
        let runner = session_cookie_header(&tokens, "runner@example.com");

        let response = server
            .get("/registrations/by-applicant/someone-else@example.com")
            .add_header(header::COOKIE, cookie(&runner))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["message"], "unauthorized access");
    }
}
