// KPI summary model and metric tile formatting
use super::table::{coerce_numeric, ColumnMissing, Table};
use serde::Serialize;
use std::collections::HashMap;

pub const METRIC_COLUMN: &str = "Metric";
pub const VALUE_COLUMN: &str = "Value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileFormat {
    /// Thousands separators, no decimals
    Amount,
    /// Truncated to an integer, thousands separators
    Count,
    /// Thousands separators, two decimals
    Average,
}

impl TileFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            TileFormat::Amount => format_grouped(value, 0),
            TileFormat::Count => format_grouped(value.trunc(), 0),
            TileFormat::Average => format_grouped(value, 2),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TileSpec {
    pub metric: &'static str,
    pub title: &'static str,
    pub format: TileFormat,
}

pub const TILE_SPECS: [TileSpec; 4] = [
    TileSpec {
        metric: "Total_Revenue",
        title: "Total Revenue",
        format: TileFormat::Amount,
    },
    TileSpec {
        metric: "Total_Orders",
        title: "Total Orders",
        format: TileFormat::Count,
    },
    TileSpec {
        metric: "Total_Customers",
        title: "Total Customers",
        format: TileFormat::Count,
    },
    TileSpec {
        metric: "Avg_Order_Value",
        title: "Avg Order Value",
        format: TileFormat::Average,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTile {
    pub metric: String,
    pub title: String,
    pub value: f64,
    pub display: String,
}

impl MetricTile {
    pub fn new(spec: &TileSpec, value: f64) -> Self {
        Self {
            metric: spec.metric.to_string(),
            title: spec.title.to_string(),
            value,
            display: spec.format.format(value),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KpiTable {
    values: HashMap<String, f64>,
}

impl KpiTable {
    /// The first numeric row for a metric wins; non-numeric values are ignored.
    pub fn from_table(table: &Table) -> Result<Self, ColumnMissing> {
        let metrics = table.column(METRIC_COLUMN)?;
        let values = table.column(VALUE_COLUMN)?;

        let mut kpis = HashMap::new();
        for (metric, value) in metrics.into_iter().zip(values) {
            if let Some(value) = coerce_numeric(value) {
                kpis.entry(metric.trim().to_string()).or_insert(value);
            }
        }

        Ok(Self { values: kpis })
    }

    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.values.get(name).copied().unwrap_or(default)
    }

    pub fn tiles(&self) -> Vec<MetricTile> {
        TILE_SPECS
            .iter()
            .map(|spec| MetricTile::new(spec, self.get(spec.metric, 0.0)))
            .collect()
    }
}

/// Format with a fixed number of decimals and comma thousands separators.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi_table(rows: &[(&str, &str)]) -> Table {
        Table::new(
            vec![METRIC_COLUMN.to_string(), VALUE_COLUMN.to_string()],
            rows.iter()
                .map(|(m, v)| vec![m.to_string(), v.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1234567.0, 0), "1,234,567");
        assert_eq!(format_grouped(45.678, 2), "45.68");
        assert_eq!(format_grouped(0.0, 0), "0");
        assert_eq!(format_grouped(0.0, 2), "0.00");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(1000.0, 0), "1,000");
        assert_eq!(format_grouped(1234.5, 2), "1,234.50");
        assert_eq!(format_grouped(-98765.4, 0), "-98,765");
        assert_eq!(format_grouped(-0.001, 2), "0.00");
    }

    #[test]
    fn test_count_format_truncates() {
        assert_eq!(TileFormat::Count.format(12345.9), "12,345");
        assert_eq!(TileFormat::Amount.format(1234567.0), "1,234,567");
        assert_eq!(TileFormat::Average.format(45.678), "45.68");
    }

    #[test]
    fn test_lookup_uses_default_for_missing_metric() {
        let kpis = KpiTable::from_table(&kpi_table(&[("Total_Revenue", "1234567")])).unwrap();
        assert_eq!(kpis.get("Total_Revenue", 0.0), 1234567.0);
        assert_eq!(kpis.get("Total_Orders", 0.0), 0.0);
        assert_eq!(kpis.get("Unknown", 3.0), 3.0);
    }

    #[test]
    fn test_first_numeric_row_wins() {
        let kpis = KpiTable::from_table(&kpi_table(&[
            ("Total_Orders", "n/a"),
            ("Total_Orders", "10"),
            ("Total_Orders", "20"),
        ]))
        .unwrap();
        assert_eq!(kpis.get("Total_Orders", 0.0), 10.0);
    }

    #[test]
    fn test_tiles_for_empty_table_show_defaults() {
        let tiles = KpiTable::default().tiles();
        let displays: Vec<&str> = tiles.iter().map(|t| t.display.as_str()).collect();
        assert_eq!(displays, vec!["0", "0", "0", "0.00"]);
        assert_eq!(tiles[0].title, "Total Revenue");
        assert_eq!(tiles[3].metric, "Avg_Order_Value");
    }

    #[test]
    fn test_tiles_format_each_metric() {
        let kpis = KpiTable::from_table(&kpi_table(&[
            ("Total_Revenue", "1234567"),
            ("Total_Orders", "4321.7"),
            ("Total_Customers", "987"),
            ("Avg_Order_Value", "45.678"),
        ]))
        .unwrap();
        let displays: Vec<String> = kpis.tiles().into_iter().map(|t| t.display).collect();
        assert_eq!(displays, vec!["1,234,567", "4,321", "987", "45.68"]);
    }

    #[test]
    fn test_missing_value_column() {
        let table = Table::new(vec![METRIC_COLUMN.to_string()], vec![]);
        assert_eq!(
            KpiTable::from_table(&table).unwrap_err(),
            ColumnMissing::new(VALUE_COLUMN)
        );
    }
}
