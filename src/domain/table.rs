// Tabular data loaded from CSV artifacts
use rand::Rng;
use rand::seq::index;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column '{column}' not found")]
pub struct ColumnMissing {
    pub column: String,
}

impl ColumnMissing {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
        }
    }
}

/// Header plus string cells. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of the named column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&str>, ColumnMissing> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| ColumnMissing::new(name))?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect())
    }

    pub fn head(&self, n: usize) -> Table {
        Table::new(
            self.columns.clone(),
            self.rows.iter().take(n).cloned().collect(),
        )
    }

    /// Random rows without replacement; never more rows than the table holds.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Table {
        let amount = n.min(self.rows.len());
        if amount == 0 {
            return Table::new(self.columns.clone(), Vec::new());
        }

        let rows = index::sample(rng, self.rows.len(), amount)
            .into_iter()
            .map(|i| self.rows[i].clone())
            .collect();
        Table::new(self.columns.clone(), rows)
    }
}

/// Parse a cell as a number. Blank, non-numeric and NaN cells are missing.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
