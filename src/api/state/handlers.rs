use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::common::{ErrorResponse, StatusResponse};
use crate::db::ParkingDocument;
use crate::AppState;

/// Always answers with some valid document; backend trouble degrades to the
/// local file or the initial state.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<ParkingDocument> {
    Json(state.state_store.load().await)
}

pub async fn save_state(
    State(state): State<Arc<AppState>>,
    Json(document): Json<ParkingDocument>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    // The store has already logged the failure.
    match state.state_store.save(document).await {
        Ok(()) => Ok(Json(StatusResponse::ok())),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
