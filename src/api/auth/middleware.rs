use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use super::helpers::{check_credentials, unauthorized};
use crate::AppState;

// Middleware guarding the manager page with HTTP basic auth
pub async fn require_manager(
    State(state): State<Arc<AppState>>,
    credentials: Option<TypedHeader<Authorization<Basic>>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = credentials.is_some_and(|TypedHeader(Authorization(basic))| {
        check_credentials(&state.config.manager, basic.username(), basic.password())
    });

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "Rejected manager page request");
        return unauthorized();
    }

    next.run(request).await
}
