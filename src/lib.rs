//! Finance Diary is a web backend for keeping a personal diary of income and
//! expenses.
//!
//! Users register and log in to receive a bearer token, then create, list,
//! update and delete dated entries and ask for a summary of their finances.
//! This library provides the REST API that serves JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod config;
mod db;
mod endpoints;
mod entry;
mod health;
mod logging;
mod not_found;
mod password;
mod routing;
#[cfg(test)]
mod test_utils;
mod timestamp;
mod user;

pub use app_state::AppState;
pub use auth::{AuthError, AuthenticatedUser, JwtKeys};
pub use config::{Environment, ServerConfig};
pub use db::initialize as initialize_db;
pub use entry::{
    Category, CategoryTotals, Entry, EntryFilter, EntryFilterParams, EntryForm, EntryId,
    EntryPatch, EntryQuery, EntryService, EntryStore, EntryType, NewEntry, SQLiteEntryStore,
    SortOrder, Summary, normalize_entry, summarize,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{User, UserID};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a missing or invalid field, e.g. an unknown category
    /// or an amount of zero.
    ///
    /// The message is safe to show to the client.
    #[error("{0}")]
    Validation(String),

    /// The requested entry does not exist or belongs to another user.
    ///
    /// The two cases are deliberately indistinguishable so that a client
    /// cannot probe for entries owned by someone else.
    #[error("Entry not found")]
    NotFound,

    /// The caller could not be authenticated.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// The email address used to register is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address used to register already belongs to a user.
    #[error("a user with this email address already exists")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A bearer token could not be created for a user.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl Error {
    /// Attach the deployment environment, which decides how much detail of
    /// an internal error is sent to the client.
    pub fn for_environment(self, environment: Environment) -> ErrorResponse {
        ErrorResponse {
            error: self,
            environment,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidEmail(_)
            | Error::DuplicateEmail
            | Error::TooWeak(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// An [Error] ready to be sent to the client as `{"error": "..."}`.
///
/// Internal errors are logged and, in production, replaced with a generic
/// message.
#[derive(Debug)]
pub struct ErrorResponse {
    error: Error,
    environment: Environment,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        let message = if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self.error);

            if self.environment.is_production() {
                "Internal server error".to_owned()
            } else {
                self.error.to_string()
            }
        } else {
            self.error.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for Error {
    /// Respond as if running in production, i.e. without internal details.
    fn into_response(self) -> Response {
        self.for_environment(Environment::Production).into_response()
    }
}
