//! Cookie-based session authentication.
//!
//! `POST /session` signs an identity claim into a JWT carried by the `token`
//! cookie; the auth middleware in `core::middleware` verifies it on every
//! protected request and attaches the identity to the request extensions.

pub mod dto;
pub mod handler;
pub mod model;
pub mod routes;
pub mod service;

pub use model::AuthenticatedUser;
pub use service::TokenService;
