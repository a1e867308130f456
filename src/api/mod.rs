pub mod auth;
pub mod common;
pub mod health;
pub mod state;
pub mod tokens;

pub use health::health;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, get_service},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::AppState;

/// Builds the full HTTP surface: JSON API, health probe, guarded manager page
/// and static assets.
pub fn router(app_state: Arc<AppState>) -> Router {
    let static_dir = app_state.config.static_dir.clone();

    let manager_page = Router::new()
        .route(
            "/manager.html",
            get_service(ServeFile::new(static_dir.join("manager.html"))),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_manager,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api/db", get(state::get_state).post(state::save_state))
        .route("/api/tokens", get(tokens::list_tokens))
        .route("/api/validate_token", get(tokens::validate_token))
        .merge(manager_page)
        .fallback_service(ServeDir::new(&static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
        .with_state(app_state)
}
