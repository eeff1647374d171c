// Dashboard domain model - the render tree produced for each request
use super::kpi::MetricTile;
use super::table::Table;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub tiles: Vec<MetricTile>,
    /// Page-level notices, e.g. an unreadable KPI summary
    pub notices: Vec<Block>,
    pub tabs: Vec<Tab>,
    pub caption: String,
    pub rendered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Tab {
    pub fn new(id: &str, icon: &str, title: &str, sections: Vec<Section>) -> Self {
        Self {
            id: id.to_string(),
            icon: icon.to_string(),
            title: title.to_string(),
            sections,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(heading: &str, blocks: Vec<Block>) -> Self {
        Self {
            heading: heading.to_string(),
            blocks,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Image { file: String, url: String },
    Table(TablePreview),
    BarChart(BarChart),
    /// Placeholder for an absent input
    Info { message: String },
    /// Input exists but could not be used
    Warning { message: String },
}

impl Block {
    pub fn info(message: impl Into<String>) -> Self {
        Block::Info {
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Block::Warning {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TablePreview {
    pub file: String,
    pub total_rows: usize,
    pub table: Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    Viridis,
    Magma,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub id: String,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: String,
    pub palette: Palette,
    pub bars: Vec<Bar>,
}
