// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::dashboard_source::DashboardSource;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::file_source::FileSource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;

    if !app_config.data.base_dir.is_dir() {
        tracing::warn!(
            base_dir = %app_config.data.base_dir.display(),
            "Data directory does not exist yet; every section will show its placeholder"
        );
    }

    // Artifacts are read fresh from disk on every request
    let source: Arc<dyn DashboardSource> = Arc::new(FileSource::new(&app_config.data.base_dir));
    let dashboard_service = DashboardService::new(source.clone(), app_config.dashboard.clone());

    let state = Arc::new(AppState {
        dashboard_service,
        assets: source,
    });
    let router = build_router(state);

    // Start server
    let addr = app_config.server.socket_addr()?;
    tracing::info!(
        %addr,
        base_dir = %app_config.data.base_dir.display(),
        "Starting storefront-insights dashboard"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
