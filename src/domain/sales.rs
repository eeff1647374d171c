// Sales records and the revenue-by-region aggregate
use super::table::{coerce_numeric, ColumnMissing, Table};
use serde::Serialize;
use std::collections::BTreeMap;

pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";
pub const REGION: &str = "region";
pub const REVENUE: &str = "Revenue";

/// Per-row revenue. A precomputed `Revenue` column is used as is (coerced to
/// numbers); otherwise it is `quantity * unit_price`, missing if either
/// factor is missing.
pub fn revenue(table: &Table) -> Result<Vec<Option<f64>>, ColumnMissing> {
    if table.has_column(REVENUE) {
        return Ok(table
            .column(REVENUE)?
            .into_iter()
            .map(coerce_numeric)
            .collect());
    }

    let quantities = table.column(QUANTITY)?;
    let prices = table.column(UNIT_PRICE)?;
    Ok(quantities
        .into_iter()
        .zip(prices)
        .map(|(q, p)| Some(coerce_numeric(q)? * coerce_numeric(p)?).filter(|r| r.is_finite()))
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionRevenue {
    pub totals: BTreeMap<String, f64>,
}

impl RegionRevenue {
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Sum revenue per region. Missing revenues are skipped and rows without a
/// region are dropped; regions come out sorted by name.
pub fn revenue_by_region(table: &Table) -> Result<RegionRevenue, ColumnMissing> {
    let revenues = revenue(table)?;
    let regions = table.column(REGION)?;

    let mut totals = BTreeMap::new();
    for (region, revenue) in regions.into_iter().zip(revenues) {
        if region.is_empty() {
            continue;
        }
        let total = totals.entry(region.to_string()).or_insert(0.0);
        if let Some(revenue) = revenue {
            *total += revenue;
        }
    }

    Ok(RegionRevenue { totals })
}
