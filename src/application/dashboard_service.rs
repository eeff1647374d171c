// Dashboard service - Use case for rendering the dashboard from whatever artifacts exist
use crate::application::dashboard_source::{
    DashboardSource, Loaded, SourceError, KPI_SUMMARY, REVENUE_TREND, RFM_SEGMENTS, RFM_SUMMARY,
    RFM_WITH_CHURN, SALES_DATA, TOP_CATEGORIES,
};
use crate::domain::churn::{churn_counts, CHURN_LABEL};
use crate::domain::dashboard::{Bar, BarChart, Block, Dashboard, Palette, Section, Tab, TablePreview};
use crate::domain::kpi::{KpiTable, MetricTile};
use crate::domain::sales::revenue_by_region;
use crate::domain::table::Table;
use crate::infrastructure::config::DashboardSettings;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Instant, UNIX_EPOCH};

pub const RFM_SUMMARY_ROWS: usize = 15;
pub const CHURN_SAMPLE_ROWS: usize = 10;
pub const SALES_PREVIEW_ROWS: usize = 20;

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn DashboardSource>,
    settings: DashboardSettings,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DashboardSource>, settings: DashboardSettings) -> Self {
        Self { source, settings }
    }

    /// One full pass over the current directory contents. Never fails: every
    /// section degrades on its own when its input is absent or unusable.
    pub async fn render(&self) -> Dashboard {
        let start_time = Instant::now();

        let (tiles, notices) = self.metric_tiles().await;
        let tabs = vec![
            self.sales_trends_tab().await,
            self.rfm_churn_tab().await,
            self.raw_tables_tab().await,
        ];

        tracing::debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            notices = notices.len(),
            "Dashboard rendered"
        );

        Dashboard {
            title: self.settings.title.clone(),
            tiles,
            notices,
            tabs,
            caption: self.settings.caption.clone(),
            rendered_at: Utc::now(),
        }
    }

    async fn metric_tiles(&self) -> (Vec<MetricTile>, Vec<Block>) {
        match self.source.load_table(KPI_SUMMARY).await {
            Ok(loaded) => match KpiTable::from_table(&loaded.value) {
                Ok(kpis) => (kpis.tiles(), Vec::new()),
                Err(missing) => (
                    KpiTable::default().tiles(),
                    vec![Block::warning(format!("Column '{}' not found in {}.", missing.column, loaded.file))],
                ),
            },
            Err(e) => (
                KpiTable::default().tiles(),
                vec![unavailable(e, "kpi_summary.csv not found. Metrics show their defaults.")],
            ),
        }
    }

    async fn sales_trends_tab(&self) -> Tab {
        let sections = vec![
            self.image_section(
                "Monthly Revenue Trend",
                REVENUE_TREND,
                "No revenue_trend.png found. Re-run the plotting cell with savefig().",
            )
            .await,
            self.region_revenue_section().await,
            self.image_section(
                "Top 10 Categories by Revenue",
                TOP_CATEGORIES,
                "top_categories.png not found. Save the category plot as top_categories.png.",
            )
            .await,
        ];
        Tab::new("sales-trends", "📈", "Sales Trends", sections)
    }

    async fn rfm_churn_tab(&self) -> Tab {
        let sections = vec![
            self.rfm_summary_section().await,
            self.image_section(
                "Top RFM Segments (by count)",
                RFM_SEGMENTS,
                "rfm_segments.png not found. Save the RFM segments plot as rfm_segments.png.",
            )
            .await,
            self.churn_section().await,
        ];
        Tab::new("rfm-churn", "👥", "RFM & Churn", sections)
    }

    async fn raw_tables_tab(&self) -> Tab {
        let block = match self.source.load_table(SALES_DATA).await {
            Ok(loaded) => preview(&loaded, loaded.value.head(SALES_PREVIEW_ROWS)),
            Err(e) => unavailable(e, "sales_data.csv not found."),
        };
        Tab::new(
            "raw-tables",
            "📊",
            "Raw Tables",
            vec![Section::new("Sample Sales Rows", vec![block])],
        )
    }

    async fn image_section(&self, heading: &str, file: &str, hint: &str) -> Section {
        let block = match self.source.locate_image(file).await {
            Ok(loaded) => {
                tracing::debug!(file, bytes = loaded.value.size, "Image artifact present");
                let version = loaded
                    .modified
                    .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs());
                Block::Image {
                    url: asset_url(&loaded.file, version),
                    file: loaded.file,
                }
            }
            Err(e) => unavailable(e, hint),
        };
        Section::new(heading, vec![block])
    }

    async fn region_revenue_section(&self) -> Section {
        let block = match self.source.load_table(SALES_DATA).await {
            Ok(loaded) => region_chart_block(&loaded),
            Err(e) => unavailable(e, "sales_data.csv not found."),
        };
        Section::new("Revenue by Region", vec![block])
    }

    async fn rfm_summary_section(&self) -> Section {
        let block = match self.source.load_table(RFM_SUMMARY).await {
            Ok(loaded) => preview(&loaded, loaded.value.head(RFM_SUMMARY_ROWS)),
            Err(e) => unavailable(e, "rfm_summary.csv not found."),
        };
        Section::new("RFM Segment Summary", vec![block])
    }

    async fn churn_section(&self) -> Section {
        let blocks = match self.source.load_table(RFM_WITH_CHURN).await {
            Ok(loaded) => self.churn_blocks(&loaded),
            Err(e) => vec![unavailable(e, "rfm_with_churn.csv not found.")],
        };
        Section::new("RFM with Churn (sample + chart)", blocks)
    }

    fn churn_blocks(&self, loaded: &Loaded<Table>) -> Vec<Block> {
        let mut rng = self.sampler();
        let sample = loaded.value.sample(CHURN_SAMPLE_ROWS, &mut rng);
        let mut blocks = vec![preview(loaded, sample)];

        let chart = match churn_counts(&loaded.value) {
            Ok(_) if loaded.value.is_empty() => {
                Block::info(format!("{} has no rows to chart.", loaded.file))
            }
            Ok(counts) => {
                tracing::debug!(
                    rows = counts.total(),
                    churned = counts.get(CHURN_LABEL),
                    "Counted churn labels"
                );
                Block::BarChart(BarChart {
                    id: "churn-distribution".to_string(),
                    title: "Churn vs Non-Churn Customers".to_string(),
                    x_label: None,
                    y_label: "Number of Customers".to_string(),
                    palette: Palette::Magma,
                    bars: counts
                        .counts
                        .into_iter()
                        .map(|c| Bar {
                            label: c.label,
                            value: c.count as f64,
                        })
                        .collect(),
                })
            }
            Err(missing) => {
                Block::info(format!("Column '{}' not found in {}.", missing.column, loaded.file))
            }
        };
        blocks.push(chart);
        blocks
    }

    fn sampler(&self) -> StdRng {
        match self.settings.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn region_chart_block(loaded: &Loaded<Table>) -> Block {
    match revenue_by_region(&loaded.value) {
        Ok(by_region) if by_region.totals.is_empty() => {
            Block::info(format!("{} has no rows with a region.", loaded.file))
        }
        Ok(by_region) => {
            tracing::debug!(
                regions = by_region.totals.len(),
                total = by_region.total(),
                "Aggregated revenue by region"
            );
            Block::BarChart(BarChart {
                id: "revenue-by-region".to_string(),
                title: "Revenue by Region".to_string(),
                x_label: Some("Region".to_string()),
                y_label: "Total Revenue".to_string(),
                palette: Palette::Viridis,
                bars: by_region
                    .totals
                    .into_iter()
                    .map(|(label, value)| Bar { label, value })
                    .collect(),
            })
        }
        Err(missing) => Block::info(format!(
            "Column '{}' not found in {}.",
            missing.column, loaded.file
        )),
    }
}

fn preview(loaded: &Loaded<Table>, shown: Table) -> Block {
    Block::Table(TablePreview {
        file: loaded.file.clone(),
        total_rows: loaded.value.len(),
        table: shown,
    })
}

/// Placeholder for a section whose input could not be loaded. Absence is the
/// normal case and renders as info; anything else renders as a warning.
fn unavailable(error: SourceError, missing_message: &str) -> Block {
    match error {
        SourceError::Missing { file } => {
            tracing::debug!(file = %file, "Artifact not present");
            Block::info(missing_message)
        }
        other => {
            tracing::warn!(error = %other, "Artifact unusable");
            Block::warning(other.to_string())
        }
    }
}

/// Browser URL for an image artifact; the version suffix changes when the file does
pub fn asset_url(file: &str, version: Option<u64>) -> String {
    let encoded = urlencoding::encode(file);
    match version {
        Some(version) => format!("/assets/{}?v={}", encoded, version),
        None => format!("/assets/{}", encoded),
    }
}
