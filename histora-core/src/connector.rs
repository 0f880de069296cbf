use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::HistoraError;
pub use histora_types::ConnectorKey;
use histora_types::{Granularity, OhlcvRecord, QuoteCurrency};

/// Parameters of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Base asset symbol, e.g. `BTC`.
    pub symbol: String,
    /// Number of ticks to request; never above the connector's `page_cap`.
    pub size: u32,
    /// Return data at or before this instant; `None` asks for the most recent data.
    pub cursor: Option<DateTime<Utc>>,
}

/// One page of records returned by a provider call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Records as returned by the provider.
    pub records: Vec<OhlcvRecord>,
    /// Earliest timestamp the provider reports for this page. Connectors whose
    /// provider does not report it may leave this `None`; see [`Page::earliest`].
    pub time_from: Option<DateTime<Utc>>,
}

impl Page {
    /// Build a page whose earliest timestamp is derived from its records.
    #[must_use]
    pub fn from_records(records: Vec<OhlcvRecord>) -> Self {
        Self {
            records,
            time_from: None,
        }
    }

    /// Earliest timestamp of the page: the provider-reported value when
    /// present, otherwise the minimum record time.
    #[must_use]
    pub fn earliest(&self) -> Option<DateTime<Utc>> {
        self.time_from
            .or_else(|| self.records.iter().map(|r| r.time).min())
    }

    /// True when the provider returned no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Role trait for connectors that serve paginated OHLCV history.
///
/// A connector instance is bound to one granularity and one quote currency.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Stable connector name used in errors and traces.
    fn name(&self) -> &'static str;

    /// Human-readable vendor name. Defaults to `name()`.
    fn vendor(&self) -> &'static str {
        self.name()
    }

    /// Typed key for this connector.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Tick granularity this instance serves.
    fn granularity(&self) -> Granularity;

    /// Quote currency this instance prices in.
    fn quote(&self) -> QuoteCurrency;

    /// Maximum number of ticks the provider returns per call.
    fn page_cap(&self) -> u32;

    /// Fetch one page of history.
    ///
    /// # Errors
    /// Returns `Provider` when the provider answers with an error payload and
    /// `Transport` for HTTP or decoding failures.
    async fn fetch_page(&self, req: PageRequest) -> Result<Page, HistoraError>;
}
