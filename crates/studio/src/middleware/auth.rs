//! Authentication extractors for the studio API.
//!
//! Customer identity arrives as an `Authorization: Bearer <token>` header
//! carrying an HS256 JWT minted by the auth provider; the studio only
//! validates the signature and expiry and extracts the subject. The internal
//! maintenance surface authenticates with a shared scheduler secret instead.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aurelia_core::UserId;

use crate::state::AppState;

/// JWT claims embedded in every customer access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the customer's user id at the auth provider.
    pub sub: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// The authenticated customer for the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// Customer user id.
    pub id: UserId,
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.id)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Error returned when bearer authentication fails.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "Unauthorized" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection)?;

        let claims = validate_bearer_token(token, &state.config().auth.jwt_secret)
            .map_err(|_| AuthRejection)?;

        Ok(Self(CurrentUser {
            id: UserId::new(claims.sub),
        }))
    }
}

/// Extractor that requires the external scheduler's shared secret.
///
/// The internal maintenance surface is not customer-facing; the scheduler
/// presents its secret as a bearer token.
pub struct RequireScheduler;

impl FromRequestParts<AppState> for RequireScheduler {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection)?;

        if token != state.config().scheduler_secret.expose_secret() {
            return Err(AuthRejection);
        }

        Ok(Self)
    }
}

/// Pull the bearer token out of the Authorization header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
///
/// # Errors
///
/// Returns an error if the token is malformed, expired, or signed with a
/// different secret.
pub fn validate_bearer_token(
    token: &str,
    secret: &SecretString,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
