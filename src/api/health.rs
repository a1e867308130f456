use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::db::BackendMode;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    backend: BackendMode,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        backend: state.state_store.mode(),
    })
}
