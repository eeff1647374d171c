// Source trait for dashboard artifacts
use crate::domain::table::Table;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::SystemTime;
use thiserror::Error;

pub const KPI_SUMMARY: &str = "kpi_summary.csv";
pub const SALES_DATA: &str = "sales_data.csv";
pub const REVENUE_TREND: &str = "revenue_trend.png";
pub const TOP_CATEGORIES: &str = "top_categories.png";
pub const RFM_SUMMARY: &str = "rfm_summary.csv";
pub const RFM_SEGMENTS: &str = "rfm_segments.png";
pub const RFM_WITH_CHURN: &str = "rfm_with_churn.csv";

/// Files that may be served verbatim to the browser
pub const IMAGE_ARTIFACTS: [&str; 3] = [REVENUE_TREND, TOP_CATEGORIES, RFM_SEGMENTS];

pub fn is_image_artifact(file: &str) -> bool {
    IMAGE_ARTIFACTS.contains(&file)
}

/// A successfully read artifact
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub file: String,
    pub value: T,
    pub modified: Option<SystemTime>,
}

impl<T> Loaded<T> {
    pub fn new(file: &str, value: T, modified: Option<SystemTime>) -> Self {
        Self {
            file: file.to_string(),
            value,
            modified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub content_type: &'static str,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct AssetBytes {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{file} not found")]
    Missing { file: String },
    #[error("{file} could not be parsed: {reason}")]
    Corrupt { file: String, reason: String },
    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{file} is not a dashboard artifact")]
    NotAllowed { file: String },
}

impl SourceError {
    pub fn is_missing(&self) -> bool {
        matches!(self, SourceError::Missing { .. })
    }
}

#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Read and parse a CSV artifact
    async fn load_table(&self, file: &str) -> Result<Loaded<Table>, SourceError>;

    /// Check that an image artifact exists without reading it
    async fn locate_image(&self, file: &str) -> Result<Loaded<ImageAsset>, SourceError>;

    /// Read an image artifact for passthrough. Only `IMAGE_ARTIFACTS` are served.
    async fn read_asset(&self, file: &str) -> Result<Loaded<AssetBytes>, SourceError>;
}

pub fn content_type_for(file: &str) -> &'static str {
    let extension = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}
