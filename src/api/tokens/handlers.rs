use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{Apartment, TokenLookup, TokenMap};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidateTokenResponse {
    Ok { apt: Apartment },
    Error { message: String },
}

pub async fn list_tokens(State(state): State<Arc<AppState>>) -> Json<TokenMap> {
    Json(state.token_table.load().await)
}

pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ValidateTokenResponse>, (StatusCode, Json<ValidateTokenResponse>)> {
    let token = first_token(&params);

    match state.token_table.validate(token).await {
        TokenLookup::Valid(apt) => Ok(Json(ValidateTokenResponse::Ok { apt })),
        TokenLookup::NotFound => {
            tracing::debug!("Rejected unknown token");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ValidateTokenResponse::Error {
                    message: "Invalid token".to_string(),
                }),
            ))
        }
    }
}

/// First `token` value in the query string; repeated keys are not an error.
fn first_token(params: &[(String, String)]) -> &str {
    params
        .iter()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}
