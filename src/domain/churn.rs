// Churn distribution over the RFM-with-churn table
use super::table::{coerce_numeric, ColumnMissing, Table};
use serde::Serialize;
use std::collections::HashMap;

pub const CHURN: &str = "Churn";

pub const NOT_CHURN_LABEL: &str = "Not Churn";
pub const CHURN_LABEL: &str = "Churn";
pub const MISSING_LABEL: &str = "Missing";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChurnCounts {
    pub counts: Vec<ChurnCount>,
}

impl ChurnCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn get(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

fn label_for(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return MISSING_LABEL.to_string();
    }
    match coerce_numeric(trimmed) {
        Some(v) if v == 0.0 => NOT_CHURN_LABEL.to_string(),
        Some(v) if v == 1.0 => CHURN_LABEL.to_string(),
        _ => trimmed.to_string(),
    }
}

/// Count rows per churn label, most frequent first. Every row is counted,
/// so the counts always add up to the table length.
pub fn churn_counts(table: &Table) -> Result<ChurnCounts, ColumnMissing> {
    let mut by_label: HashMap<String, usize> = HashMap::new();
    for cell in table.column(CHURN)? {
        *by_label.entry(label_for(cell)).or_insert(0) += 1;
    }

    let mut counts: Vec<ChurnCount> = by_label
        .into_iter()
        .map(|(label, count)| ChurnCount { label, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    Ok(ChurnCounts { counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn churn_table(values: &[&str]) -> Table {
        Table::new(
            vec!["CustomerID".to_string(), CHURN.to_string()],
            values
                .iter()
                .enumerate()
                .map(|(i, v)| vec![i.to_string(), v.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_relabels_binary_values() {
        let counts = churn_counts(&churn_table(&["0", "1", "0", "0", "1.0"])).unwrap();
        assert_eq!(
            counts.counts,
            vec![
                ChurnCount { label: NOT_CHURN_LABEL.to_string(), count: 3 },
                ChurnCount { label: CHURN_LABEL.to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_counts_sum_to_row_count() {
        let values = ["0", "1", "", "yes", "1", "0", "0"];
        let counts = churn_counts(&churn_table(&values)).unwrap();
        assert_eq!(counts.total(), values.len());
        assert_eq!(counts.get(MISSING_LABEL), 1);
        assert_eq!(counts.get("yes"), 1);
    }

    #[test]
    fn test_empty_table() {
        let counts = churn_counts(&churn_table(&[])).unwrap();
        assert!(counts.counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_missing_churn_column() {
        let table = Table::new(vec!["CustomerID".to_string()], vec![]);
        assert_eq!(churn_counts(&table).unwrap_err(), ColumnMissing::new(CHURN));
    }
}
