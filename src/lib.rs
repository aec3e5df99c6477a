// src/lib.rs
pub mod auth;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Builds the full application router: all /api/v1 routes plus health,
/// with CORS applied.
pub fn build_app(app_state: AppState) -> Router {
    let api = routes::create_router()
        .route("/", get(|| async { "IMS API" }))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api/v1", api)
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health_check() -> &'static str {
    "OK"
}
