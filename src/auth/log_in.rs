//! Handles log-in requests, exchanging an email and password for a bearer token.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    Error, ErrorResponse,
    auth::{AuthError, AuthResponse, AuthState, Credentials, normalize_email},
    user::get_user_by_email,
};

/// Handler for log-in requests via the POST method.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn post_log_in(
    State(state): State<AuthState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthResponse>, ErrorResponse> {
    let environment = state.environment;

    log_in(state, credentials)
        .map(Json)
        .map_err(|error| error.for_environment(environment))
}

fn log_in(
    state: AuthState,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<AuthResponse, Error> {
    let Json(credentials) = credentials?;
    let email = normalize_email(&credentials.email);

    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        get_user_by_email(&email, &connection)?
    };

    let user = user.ok_or(AuthError::WrongCredentials)?;

    let is_password_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_correct {
        tracing::debug!("Wrong password for user {}", user.id);
        return Err(AuthError::WrongCredentials.into());
    }

    let token = state.jwt_keys.issue(user.id)?;

    Ok(AuthResponse { token, user })
}
