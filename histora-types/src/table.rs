//! Calendar-indexed close-price table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HistoraError;
use crate::market::Granularity;

/// Close prices for one symbol, one cell per calendar instant.
///
/// `None` marks a cell with no observation and no earlier value to carry
/// forward. It is never conflated with a zero price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceColumn {
    /// Symbol the column belongs to.
    pub symbol: String,
    /// Cells aligned with the table index.
    pub cells: Vec<Option<f64>>,
}

impl PriceColumn {
    /// Index of the first unpopulated cell, if any.
    #[must_use]
    pub fn first_gap(&self) -> Option<usize> {
        self.cells.iter().position(Option::is_none)
    }

    /// Number of populated cells.
    #[must_use]
    pub fn populated(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Fixed-frequency table mapping each calendar instant to per-symbol close prices.
///
/// Invariants:
/// - `index` is strictly increasing and contiguous at `granularity`.
/// - every column has exactly `index.len()` cells.
/// - symbols are unique; columns keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct AlignedTable {
    granularity: Granularity,
    index: Vec<DateTime<Utc>>,
    columns: Vec<PriceColumn>,
}

#[derive(Deserialize)]
struct TableParts {
    granularity: Granularity,
    index: Vec<DateTime<Utc>>,
    columns: Vec<PriceColumn>,
}

impl TryFrom<TableParts> for AlignedTable {
    type Error = HistoraError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        let mut table = Self::new(parts.granularity, parts.index)?;
        for column in parts.columns {
            table.insert_column(column)?;
        }
        Ok(table)
    }
}

impl AlignedTable {
    /// Create an empty table over a calendar index.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the index is not strictly increasing and
    /// contiguous at the given granularity.
    pub fn new(granularity: Granularity, index: Vec<DateTime<Utc>>) -> Result<Self, HistoraError> {
        let step = granularity.step();
        if let Some(w) = index.windows(2).find(|w| w[1] - w[0] != step) {
            return Err(HistoraError::InvalidArg(format!(
                "calendar is not contiguous at {granularity}: {} -> {}",
                w[0], w[1]
            )));
        }
        Ok(Self {
            granularity,
            index,
            columns: Vec::new(),
        })
    }

    /// Add a symbol column.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the column length does not match the index or
    /// the symbol already has a column.
    pub fn insert_column(&mut self, column: PriceColumn) -> Result<(), HistoraError> {
        if column.cells.len() != self.index.len() {
            return Err(HistoraError::InvalidArg(format!(
                "column {} has {} cells, calendar has {}",
                column.symbol,
                column.cells.len(),
                self.index.len()
            )));
        }
        if self.column(&column.symbol).is_some() {
            return Err(HistoraError::InvalidArg(format!(
                "duplicate column for symbol '{}'",
                column.symbol
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Tick granularity of the index.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Calendar instants.
    #[must_use]
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Columns in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    /// Column for a symbol.
    #[must_use]
    pub fn column(&self, symbol: &str) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| c.symbol == symbol)
    }

    /// Symbols in column order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.symbol.as_str())
    }

    /// Cell for a symbol at a calendar instant. Outer `None` means the symbol
    /// or instant is not in the table; inner `None` means no data.
    #[must_use]
    pub fn cell(&self, symbol: &str, at: DateTime<Utc>) -> Option<Option<f64>> {
        let row = self.index.binary_search(&at).ok()?;
        self.column(symbol).map(|c| c.cells[row])
    }

    /// Iterate rows as `(instant, cells in column order)`.
    pub fn rows(&self) -> impl Iterator<Item = (DateTime<Utc>, Vec<Option<f64>>)> + '_ {
        self.index
            .iter()
            .enumerate()
            .map(|(i, ts)| (*ts, self.columns.iter().map(|c| c.cells[i]).collect()))
    }

    /// Number of calendar rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the calendar is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Fail on the first unpopulated cell of any column.
    ///
    /// # Errors
    /// Returns `DataGap` naming the symbol and calendar instant.
    pub fn require_complete(&self) -> Result<(), HistoraError> {
        for col in &self.columns {
            if let Some(i) = col.first_gap() {
                return Err(HistoraError::DataGap {
                    symbol: col.symbol.clone(),
                    at: self.index[i],
                });
            }
        }
        Ok(())
    }
}
