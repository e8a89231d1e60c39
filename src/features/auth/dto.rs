use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Identity claim submitted on login. The platform authenticates users on the
/// client side; the server only binds the claimed email into a session token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SessionRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}
