//! Liveness endpoint
//!
//! Always 200 while the process serves requests. The store connection is
//! established lazily, so `idle` before the first store call is normal.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    /// `connected` or `idle`
    pub store: &'static str,
}

/// GET /health
async fn liveness(State(state): State<AppState>) -> Json<Liveness> {
    let store = if state.store().is_connected().await {
        "connected"
    } else {
        "idle"
    };
    Json(Liveness { status: "ok", store })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(liveness))
}
