//! Raw OHLCV records and per-symbol series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::market::{Granularity, QuoteCurrency};

/// One OHLCV tick as returned by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    /// Tick timestamp (UTC).
    pub time: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Volume in units of the base asset.
    pub volume_from: f64,
    /// Volume in units of the quote currency.
    pub volume_to: f64,
}

/// Chronologically ordered records for one symbol, tagged with its quote currency.
///
/// Boundary records repeated across adjacent provider pages are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    /// Base asset symbol, e.g. `BTC`.
    pub symbol: String,
    /// Quote currency the prices are expressed in.
    pub quote: QuoteCurrency,
    /// Records in ascending time order.
    pub records: Vec<OhlcvRecord>,
}

impl SymbolSeries {
    /// Create an empty series.
    #[must_use]
    pub fn new(symbol: impl Into<String>, quote: QuoteCurrency) -> Self {
        Self {
            symbol: symbol.into(),
            quote,
            records: Vec::new(),
        }
    }

    /// `SYM/QUOTE` label used in raw exports.
    #[must_use]
    pub fn ticker(&self) -> String {
        format!("{}/{}", self.symbol, self.quote)
    }

    /// Earliest record timestamp, if any.
    #[must_use]
    pub fn first_time(&self) -> Option<DateTime<Utc>> {
        self.records.first().map(|r| r.time)
    }

    /// Latest record timestamp, if any.
    #[must_use]
    pub fn last_time(&self) -> Option<DateTime<Utc>> {
        self.records.last().map(|r| r.time)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Raw artifacts for a run: one series per symbol, in request order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBundle {
    /// Tick granularity shared by every series.
    pub granularity: Granularity,
    /// Per-symbol series.
    pub series: Vec<SymbolSeries>,
}

impl RawBundle {
    /// Empty bundle for one granularity.
    #[must_use]
    pub const fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            series: Vec::new(),
        }
    }

    /// Look up a symbol's series.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&SymbolSeries> {
        self.series.iter().find(|s| s.symbol == symbol)
    }

    /// Symbols present in the bundle, in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.symbol.as_str())
    }
}
