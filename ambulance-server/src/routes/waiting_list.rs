//! Waiting list endpoints
//!
//! `/api/waiting-list/{ambulance_id}/entries[/{entry_id}]`

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use ambulance_core::{EntryPatch, NewEntry, WaitingListEntry};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/waiting-list/{ambulance_id}/entries
async fn list_entries(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
) -> Result<Json<Vec<WaitingListEntry>>, ApiError> {
    let entries = state.waiting_list().entries(&ambulance_id).await?;
    Ok(Json(entries))
}

/// POST /api/waiting-list/{ambulance_id}/entries
async fn create_entry(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
    payload: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Json<WaitingListEntry>, ApiError> {
    let Json(entry) = payload?;
    let created = state
        .waiting_list()
        .create_entry(&ambulance_id, entry)
        .await?;
    Ok(Json(created))
}

/// GET /api/waiting-list/{ambulance_id}/entries/{entry_id}
async fn get_entry(
    State(state): State<AppState>,
    Path((ambulance_id, entry_id)): Path<(String, String)>,
) -> Result<Json<WaitingListEntry>, ApiError> {
    let entry = state.waiting_list().entry(&ambulance_id, &entry_id).await?;
    Ok(Json(entry))
}

/// PUT /api/waiting-list/{ambulance_id}/entries/{entry_id}
async fn update_entry(
    State(state): State<AppState>,
    Path((ambulance_id, entry_id)): Path<(String, String)>,
    payload: Result<Json<EntryPatch>, JsonRejection>,
) -> Result<Json<WaitingListEntry>, ApiError> {
    let Json(patch) = payload?;
    let updated = state
        .waiting_list()
        .update_entry(&ambulance_id, &entry_id, patch)
        .await?;
    Ok(Json(updated))
}

/// DELETE /api/waiting-list/{ambulance_id}/entries/{entry_id}
async fn delete_entry(
    State(state): State<AppState>,
    Path((ambulance_id, entry_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .waiting_list()
        .delete_entry(&ambulance_id, &entry_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Waiting list routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/waiting-list/{ambulance_id}/entries",
            get(list_entries).post(create_entry),
        )
        .route(
            "/api/waiting-list/{ambulance_id}/entries/{entry_id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}
