use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde_json::{Value, json};

use crate::{
    AuthenticatedUser, ErrorResponse,
    entry::{DatabaseId, EntryId, EntryState, state::invalid_entry_id},
};

/// A route handler for deleting one of the caller's entries.
pub async fn delete_entry_endpoint(
    State(state): State<EntryState>,
    AuthenticatedUser(owner_id): AuthenticatedUser,
    entry_id: Result<Path<DatabaseId>, PathRejection>,
) -> Result<Json<Value>, ErrorResponse> {
    let Path(entry_id) = entry_id.map_err(|rejection| state.respond(invalid_entry_id(rejection)))?;

    let entry = state
        .service
        .delete(owner_id, EntryId::new(entry_id))
        .map_err(|error| state.respond(error))?;

    tracing::debug!("Deleted entry {} for user {owner_id}", entry.id);

    Ok(Json(json!({ "message": "Entry deleted successfully" })))
}
