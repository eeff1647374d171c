// Infrastructure layer - External dependencies and adapters
pub mod chart_svg;
pub mod config;
pub mod file_source;
pub mod html;
pub mod http_response;
