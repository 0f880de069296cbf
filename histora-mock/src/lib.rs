//! histora-mock
//!
//! Connectors for CI-safe tests and demos:
//! - [`MockConnector`]: deterministic synthetic history for any symbol.
//! - [`ScriptedConnector`]: replays queued per-symbol responses and logs
//!   every request it receives.
#![warn(missing_docs)]

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use histora_core::{
    Granularity, HistoraError, HistoryProvider, OhlcvRecord, Page, PageRequest, QuoteCurrency,
};

pub mod fixtures;
mod scripted;

pub use scripted::{MockBehavior, ScriptController, ScriptedConnector};

/// Mock connector producing deterministic synthetic OHLCV data.
///
/// Each call returns `size + 1` points ending at the floored cursor, inclusive,
/// like the CryptoCompare endpoints. Symbol `FAIL` always fails and symbol
/// `TIMEOUT` sleeps before answering.
#[derive(Debug, Clone)]
pub struct MockConnector {
    granularity: Granularity,
    quote: QuoteCurrency,
    page_cap: u32,
    latest: DateTime<Utc>,
    listed: Option<DateTime<Utc>>,
    missing: BTreeSet<DateTime<Utc>>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new(Granularity::Day, QuoteCurrency::Usd)
    }
}

impl MockConnector {
    /// Connector name.
    pub const NAME: &'static str = "histora-mock";

    /// Instant used when a request carries no cursor (2024-01-01T00:00:00Z).
    pub const DEFAULT_LATEST: i64 = 1_704_067_200;

    /// Mock for one granularity and quote currency with a 2000-point cap.
    #[must_use]
    pub fn new(granularity: Granularity, quote: QuoteCurrency) -> Self {
        Self {
            granularity,
            quote,
            page_cap: 2000,
            latest: DateTime::from_timestamp(Self::DEFAULT_LATEST, 0).unwrap_or_default(),
            listed: None,
            missing: BTreeSet::new(),
        }
    }

    /// Override the per-call cap.
    #[must_use]
    pub const fn with_page_cap(mut self, cap: u32) -> Self {
        self.page_cap = cap;
        self
    }

    /// Nothing exists before `listed`. A page reaching past it comes back
    /// short, a cursor at `listed` returns only that record, and a cursor
    /// before it returns an empty page.
    #[must_use]
    pub const fn with_listing(mut self, listed: DateTime<Utc>) -> Self {
        self.listed = Some(listed);
        self
    }

    /// Drop these instants from every series.
    #[must_use]
    pub fn with_missing(mut self, instants: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        self.missing
            .extend(instants.into_iter().map(|t| self.granularity.floor(t)));
        self
    }

    /// Close price the mock reports for `symbol` at `time`.
    #[must_use]
    pub fn close_at(&self, symbol: &str, time: DateTime<Utc>) -> f64 {
        let seed: u32 = symbol.bytes().map(u32::from).sum();
        let tick = time.timestamp().div_euclid(self.granularity.seconds());
        f64::from(seed) + (tick.rem_euclid(100) as f64)
    }

    async fn maybe_fail_or_timeout(symbol: &str) -> Result<(), HistoraError> {
        match symbol {
            "FAIL" => Err(HistoraError::provider(
                Self::NAME,
                symbol,
                "forced failure: history",
            )),
            "TIMEOUT" => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn record(&self, symbol: &str, time: DateTime<Utc>) -> OhlcvRecord {
        let close = self.close_at(symbol, time);
        OhlcvRecord {
            time,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume_from: 10.0,
            volume_to: close * 10.0,
        }
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn quote(&self) -> QuoteCurrency {
        self.quote
    }

    fn page_cap(&self) -> u32 {
        self.page_cap
    }

    async fn fetch_page(&self, req: PageRequest) -> Result<Page, HistoraError> {
        Self::maybe_fail_or_timeout(&req.symbol).await?;
        if req.size == 0 || req.size > self.page_cap {
            return Err(HistoraError::InvalidArg(format!(
                "page size {} outside 1..={}",
                req.size, self.page_cap
            )));
        }

        let last = self.granularity.floor(req.cursor.unwrap_or(self.latest));
        let step = self.granularity.step();
        let mut records = Vec::with_capacity(req.size as usize + 1);
        let mut ts = last;
        for _ in 0..=req.size {
            if self.listed.is_some_and(|l| ts < l) {
                break;
            }
            if !self.missing.contains(&ts) {
                records.push(self.record(&req.symbol, ts));
            }
            match ts.checked_sub_signed(step) {
                Some(prev) => ts = prev,
                None => break,
            }
        }
        records.reverse();
        Ok(Page::from_records(records))
    }
}
