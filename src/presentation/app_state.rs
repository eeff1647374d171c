// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::dashboard_source::DashboardSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub assets: Arc<dyn DashboardSource>,
}
