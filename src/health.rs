//! Endpoints for checking that the server is up and how it is configured.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::{AppState, Environment, EntryService, SQLiteEntryStore, ServerConfig};

/// The state needed to report on the server's health.
#[derive(Debug, Clone)]
pub struct HealthState {
    service: EntryService<SQLiteEntryStore>,
    config: ServerConfig,
    secret_set: bool,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            service: EntryService::new(SQLiteEntryStore::new(state.db_connection.clone())),
            config: state.config.clone(),
            secret_set: state.jwt_keys.has_secret(),
        }
    }
}

/// The body of a health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    status: &'static str,
    message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    environment: Environment,
    store_connected: bool,
}

/// Report that the server is running and whether the database can be reached.
///
/// Always responds with 200 so that a broken database does not stop the
/// process from being considered alive.
pub async fn get_health(State(state): State<HealthState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "OK",
        message: "Finance Diary API is running",
        timestamp: OffsetDateTime::now_utc(),
        environment: state.config.environment,
        store_connected: state.service.is_store_connected(),
    })
}

/// Show which settings the server was started with. Secrets are never shown.
///
/// Responds with 403 in production.
pub async fn get_debug_env(State(state): State<HealthState>) -> Response {
    let config = state.config;

    if config.environment.is_production() {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Debug endpoint not available in production" })),
        )
            .into_response();
    }

    Json(json!({
        "environment": config.environment,
        "frontendUrl": config.frontend_url,
        "allowedOrigins": config.allowed_origins(),
        "tokenDurationHours": config.token_duration.whole_hours(),
        "secretSet": state.secret_set,
        "storeConnected": state.service.is_store_connected(),
    }))
    .into_response()
}
