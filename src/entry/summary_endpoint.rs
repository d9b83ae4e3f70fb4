use axum::{Json, extract::State};

use crate::{
    AuthenticatedUser, ErrorResponse,
    entry::{EntryState, Summary},
};

/// A route handler for the totals and category breakdown of the caller's entries.
pub async fn get_summary_endpoint(
    State(state): State<EntryState>,
    AuthenticatedUser(owner_id): AuthenticatedUser,
) -> Result<Json<Summary>, ErrorResponse> {
    state
        .service
        .summary(owner_id)
        .map(Json)
        .map_err(|error| state.respond(error))
}
