//! Extracts the authenticated user from the bearer token on a request.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejectionReason,
};
use serde_json::json;

use crate::{auth::JwtKeys, user::UserID};

/// The reasons a caller could not be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request has no bearer token.
    #[error("Not authorized, no token")]
    MissingToken,
    /// The bearer token is malformed, expired or was not issued by this server.
    #[error("Not authorized, token failed")]
    InvalidToken,
    /// The email address or password used to log in is wrong.
    #[error("Invalid email or password")]
    WrongCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// The user that made a request, taken from the `Authorization: Bearer` header.
///
/// Route handlers can take this as an argument to require authentication. The
/// app state must provide the [JwtKeys] used to verify tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserID);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => AuthError::MissingToken,
                _ => AuthError::InvalidToken,
            })?;

        let keys = JwtKeys::from_ref(state);

        keys.authenticate(bearer.token()).map(AuthenticatedUser)
    }
}
