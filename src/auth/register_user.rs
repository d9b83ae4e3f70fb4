//! Handles requests to create a new user account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Environment, Error, ErrorResponse,
    auth::JwtKeys,
    password::{PasswordHash, ValidatedPassword},
    user::{User, create_user},
};

/// The state needed to register and log in users.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys for signing bearer tokens.
    pub jwt_keys: JwtKeys,
    /// Decides how much detail of internal errors is sent to clients.
    pub environment: Environment,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            jwt_keys: state.jwt_keys.clone(),
            environment: state.config.environment,
            password_hash_cost: state.config.password_hash_cost,
        }
    }
}

/// The email and password sent to register or log in.
#[derive(Deserialize)]
pub struct Credentials {
    /// The user's email address. Surrounding whitespace and case are ignored.
    pub email: String,
    /// The user's password in plain text.
    pub password: String,
}

/// The response to a successful registration or log in.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// A bearer token for the user.
    pub token: String,
    /// The user the token was issued to.
    pub user: User,
}

/// Normalise an email address so that lookups ignore case and whitespace.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A route handler for creating a new user.
///
/// Responds with 201 and a bearer token for the new user.
///
/// # Errors
/// Responds with 400 if the email is invalid or already registered, or if
/// the password is too weak.
pub async fn register_user(
    State(state): State<AuthState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ErrorResponse> {
    let environment = state.environment;

    register(state, credentials)
        .map(|response| (StatusCode::CREATED, Json(response)))
        .map_err(|error| error.for_environment(environment))
}

fn register(
    state: AuthState,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<AuthResponse, Error> {
    let Json(credentials) = credentials?;
    let email = normalize_email(&credentials.email);

    if !EmailAddress::is_valid(&email) {
        return Err(Error::InvalidEmail(email));
    }

    let password = ValidatedPassword::new(&credentials.password, &[&email])?;
    let password_hash = PasswordHash::new(&password, state.password_hash_cost)?;

    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        create_user(&email, password_hash, &connection)?
    };

    tracing::info!("Registered user {}", user.id);

    let token = state.jwt_keys.issue(user.id)?;

    Ok(AuthResponse { token, user })
}
