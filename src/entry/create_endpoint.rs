use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AuthenticatedUser, ErrorResponse,
    entry::{Entry, EntryForm, EntryState},
};

/// A route handler for creating a new entry.
///
/// Responds with 201 and the stored entry, or 400 if the form is invalid.
pub async fn create_entry_endpoint(
    State(state): State<EntryState>,
    AuthenticatedUser(owner_id): AuthenticatedUser,
    form: Result<Json<EntryForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>), ErrorResponse> {
    let Json(form) = form.map_err(|rejection| state.respond(rejection.into()))?;

    let entry = state
        .service
        .create(owner_id, form)
        .map_err(|error| state.respond(error))?;

    tracing::debug!("Created entry {} for user {owner_id}", entry.id);

    Ok((StatusCode::CREATED, Json(entry)))
}
