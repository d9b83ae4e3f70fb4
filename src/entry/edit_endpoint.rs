use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    AuthenticatedUser, ErrorResponse,
    entry::{DatabaseId, Entry, EntryForm, EntryId, EntryState, state::invalid_entry_id},
};

/// A route handler for changing some or all fields of one of the caller's
/// entries.
///
/// Fields missing from the body are left unchanged.
pub async fn edit_entry_endpoint(
    State(state): State<EntryState>,
    AuthenticatedUser(owner_id): AuthenticatedUser,
    entry_id: Result<Path<DatabaseId>, PathRejection>,
    form: Result<Json<EntryForm>, JsonRejection>,
) -> Result<Json<Entry>, ErrorResponse> {
    let Path(entry_id) = entry_id.map_err(|rejection| state.respond(invalid_entry_id(rejection)))?;
    let Json(form) = form.map_err(|rejection| state.respond(rejection.into()))?;

    state
        .service
        .update(owner_id, EntryId::new(entry_id), form)
        .map(Json)
        .map_err(|error| state.respond(error))
}
