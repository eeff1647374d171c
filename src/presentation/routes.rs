// Router wiring
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{dashboard_json, health_check, serve_asset, show_dashboard};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(show_dashboard))
        .route("/api/dashboard", get(dashboard_json))
        .route("/assets/:file", get(serve_asset))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
