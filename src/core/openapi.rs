use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::events::{dtos as events_dtos, handlers as events_handlers};
use crate::features::registrations::{
    dtos as registrations_dtos, handlers as registrations_handlers,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::constants::SESSION_COOKIE;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::create_session,
        auth::handler::logout,
        // Users
        users_handlers::create_user,
        // Events
        events_handlers::create_event,
        events_handlers::home_feed,
        events_handlers::list_events,
        events_handlers::get_event,
        events_handlers::update_event,
        events_handlers::delete_event,
        events_handlers::events_by_owner,
        // Registrations
        registrations_handlers::create_registration,
        registrations_handlers::get_registration,
        registrations_handlers::update_registration,
        registrations_handlers::delete_registration,
        registrations_handlers::registrations_by_applicant,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::SessionRequestDto,
            // Users
            users_dtos::CreateUserDto,
            users_dtos::UserResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            // Events
            events_dtos::CreateEventDto,
            events_dtos::UpdateEventDto,
            events_dtos::EventResponseDto,
            ApiResponse<events_dtos::EventResponseDto>,
            ApiResponse<Vec<events_dtos::EventResponseDto>>,
            // Registrations
            registrations_dtos::CreateRegistrationDto,
            registrations_dtos::UpdateRegistrationDto,
            registrations_dtos::RegistrationResponseDto,
            ApiResponse<registrations_dtos::RegistrationResponseDto>,
            ApiResponse<Vec<registrations_dtos::RegistrationResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Cookie session endpoints"),
        (name = "users", description = "Participant accounts"),
        (name = "events", description = "Marathon events published by organizers"),
        (name = "registrations", description = "Event registrations by participants"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Marathon API",
        version = "0.1.0",
        description = "API documentation for the marathon event platform",
    )
)]
pub struct ApiDoc;

/// Adds the session-cookie security scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
