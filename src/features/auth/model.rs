use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity attached to the request by the auth middleware after the session
/// token has been verified.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub email: String,
}

impl AuthenticatedUser {
    /// Owner-scoped endpoints compare the authenticated email against the
    /// identity embedded in the path; the path alone is never trusted.
    pub fn owns(&self, email: &str) -> bool {
        self.email == email
    }
}

/// JWT payload of the session cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
