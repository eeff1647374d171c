// HTTP request handlers
use crate::application::dashboard_source::SourceError;
use crate::infrastructure::html::render_page;
use crate::infrastructure::http_response::{
    accepts_brotli, asset_response, html_response, json_response,
};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Render the dashboard page from the current directory contents
pub async fn show_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let dashboard = state.dashboard_service.render().await;

    // Chart drawing is CPU-bound
    let page = match tokio::task::spawn_blocking(move || render_page(&dashboard)).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(error = %e, "Page rendering failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match html_response(page, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// The same render tree as JSON
pub async fn dashboard_json(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let dashboard = state.dashboard_service.render().await;

    match json_response(&dashboard, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Pass a pre-rendered image through verbatim
pub async fn serve_asset(
    Path(file): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.assets.read_asset(&file).await {
        Ok(loaded) => match asset_response(loaded.value.bytes, loaded.value.content_type) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) if e.is_missing() => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
        Err(e @ SourceError::NotAllowed { .. }) => {
            tracing::debug!(file = %file, "Rejected asset request");
            (StatusCode::FORBIDDEN, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serve asset");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
