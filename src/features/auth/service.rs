use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::shared::constants::{SESSION_COOKIE, UNAUTHORIZED_MESSAGE};

/// Issues and verifies session tokens and builds the matching cookies.
///
/// Tokens are HS256 JWTs over a server-held secret; nothing is persisted
/// server-side, the cookie is the whole session.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    leeway: u64,
    /// Production deployments serve the SPA from another origin, so cookies
    /// need `Secure` + `SameSite=None`; everywhere else `Strict` applies.
    cross_site: bool,
}

impl TokenService {
    pub fn new(config: &AuthConfig, production: bool) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_ttl: config.token_ttl,
            leeway: config.jwt_leeway.as_secs(),
            cross_site: production,
        }
    }

    /// Sign an identity claim into a session token
    pub fn issue(&self, email: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            iat: now,
            exp: now + self.token_ttl.as_secs() as i64,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign session token: {}", e)))
    }

    /// Verify signature and expiry; any failure is Unauthorized, the request
    /// must never continue as anonymous.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))?;
        Ok(AuthenticatedUser {
            email: data.claims.sub,
        })
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, token);
        self.apply_attributes(&mut cookie);
        cookie
    }

    /// Expired cookie with the same attributes as the issuing one, including
    /// HttpOnly; browsers only discard the session cookie on an exact match.
    pub fn clear_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, "");
        self.apply_attributes(&mut cookie);
        cookie.make_removal();
        cookie
    }

    fn apply_attributes(&self, cookie: &mut Cookie<'static>) {
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.cross_site);
        cookie.set_same_site(if self.cross_site {
            SameSite::None
        } else {
            SameSite::Strict
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(ttl_secs: u64, leeway_secs: u64, production: bool) -> TokenService {
        TokenService::new(
            &AuthConfig {
                secret: "test-secret-key".to_string(),
                token_ttl: Duration::from_secs(ttl_secs),
                jwt_leeway: Duration::from_secs(leeway_secs),
            },
            production,
        )
    }

    #[test]
    fn issue_then_verify_round_trips_identity() {
        let tokens = service(3600, 0, false);
        let token = tokens.issue("runner@example.com").unwrap();
        let user = tokens.verify(&token).unwrap();
        assert_eq!(user.email, "runner@example.com");
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let tokens = service(3600, 0, false);
        let mut token = tokens.issue("runner@example.com").unwrap();
        token.pop();
        token.push('x');
        assert!(matches!(
            tokens.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let tokens = service(3600, 0, false);
        let other = TokenService::new(
            &AuthConfig {
                secret: "another-secret".to_string(),
                token_ttl: Duration::from_secs(3600),
                jwt_leeway: Duration::from_secs(0),
            },
            false,
        );
        let token = other.issue("runner@example.com").unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let tokens = service(3600, 0, false);
        let past = Utc::now().timestamp() - 7200;
        let claims = Claims {
            sub: "runner@example.com".to_string(),
            iat: past,
            exp: past + 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn session_cookie_attributes_follow_environment() {
        let dev = service(3600, 0, false).session_cookie("t".to_string());
        assert_eq!(dev.name(), SESSION_COOKIE);
        assert_eq!(dev.http_only(), Some(true));
        assert_eq!(dev.secure(), Some(false));
        assert_eq!(dev.same_site(), Some(SameSite::Strict));

        let prod = service(3600, 0, true).session_cookie("t".to_string());
        assert_eq!(prod.secure(), Some(true));
        assert_eq!(prod.same_site(), Some(SameSite::None));
    }

    #[test]
    fn clear_cookie_matches_issue_attributes() {
        let cleared = service(3600, 0, false).clear_cookie();
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.http_only(), Some(true));
        assert_eq!(cleared.same_site(), Some(SameSite::Strict));
        assert!(cleared.max_age().is_some_and(|d| d.is_zero()));
    }
}
