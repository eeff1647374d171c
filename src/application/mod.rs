// Application layer - Use cases over the dashboard artifacts
pub mod dashboard_service;
pub mod dashboard_source;
