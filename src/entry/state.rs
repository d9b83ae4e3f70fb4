use axum::extract::{FromRef, rejection::PathRejection};

use crate::{
    AppState, Environment, Error, ErrorResponse,
    entry::{EntryService, SQLiteEntryStore},
};

/// The state needed by the entry endpoints.
#[derive(Debug, Clone)]
pub struct EntryState {
    /// Runs entry operations against the database.
    pub service: EntryService<SQLiteEntryStore>,
    /// Decides how much detail of internal errors is sent to clients.
    pub environment: Environment,
}

impl FromRef<AppState> for EntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            service: EntryService::new(SQLiteEntryStore::new(state.db_connection.clone())),
            environment: state.config.environment,
        }
    }
}

impl EntryState {
    /// Prepare `error` to be sent to the client.
    pub fn respond(&self, error: Error) -> ErrorResponse {
        error.for_environment(self.environment)
    }
}

/// A path that does not hold a valid entry ID cannot name an existing entry.
pub(crate) fn invalid_entry_id(rejection: PathRejection) -> Error {
    tracing::debug!("Invalid entry ID in path: {}", rejection.body_text());
    Error::NotFound
}
