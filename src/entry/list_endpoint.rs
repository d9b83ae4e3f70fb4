use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};

use crate::{
    AuthenticatedUser, ErrorResponse,
    entry::{DatabaseId, Entry, EntryFilterParams, EntryId, EntryState, state::invalid_entry_id},
};

/// A route handler for listing the caller's entries, most recent first.
///
/// The query parameters `startDate`, `endDate`, `category` and `type` narrow
/// down the entries returned.
pub async fn list_entries_endpoint(
    State(state): State<EntryState>,
    AuthenticatedUser(owner_id): AuthenticatedUser,
    params: Result<Query<EntryFilterParams>, QueryRejection>,
) -> Result<Json<Vec<Entry>>, ErrorResponse> {
    let Query(params) = params.map_err(|rejection| state.respond(rejection.into()))?;

    state
        .service
        .list(owner_id, params)
        .map(Json)
        .map_err(|error| state.respond(error))
}

/// A route handler for getting one of the caller's entries.
pub async fn get_entry_endpoint(
    State(state): State<EntryState>,
    AuthenticatedUser(owner_id): AuthenticatedUser,
    entry_id: Result<Path<DatabaseId>, PathRejection>,
) -> Result<Json<Entry>, ErrorResponse> {
    let Path(entry_id) = entry_id.map_err(|rejection| state.respond(invalid_entry_id(rejection)))?;

    state
        .service
        .get(owner_id, EntryId::new(entry_id))
        .map(Json)
        .map_err(|error| state.respond(error))
}
