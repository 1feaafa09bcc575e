//! Ambulance provisioning endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use ambulance_core::{Ambulance, NewAmbulance};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/ambulance
async fn create_ambulance(
    State(state): State<AppState>,
    payload: Result<Json<NewAmbulance>, JsonRejection>,
) -> Result<Json<Ambulance>, ApiError> {
    let Json(ambulance) = payload?;
    let created = state.ambulances().create(ambulance).await?;
    Ok(Json(created))
}

/// GET /api/ambulance/{ambulance_id}
async fn get_ambulance(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
) -> Result<Json<Ambulance>, ApiError> {
    Ok(Json(state.ambulances().get(&ambulance_id).await?))
}

/// DELETE /api/ambulance/{ambulance_id}
async fn delete_ambulance(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.ambulances().delete(&ambulance_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ambulance routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ambulance", post(create_ambulance))
        .route(
            "/api/ambulance/{ambulance_id}",
            get(get_ambulance).delete(delete_ambulance),
        )
}
