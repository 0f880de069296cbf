//! CryptoCompare `data/histo*` response envelope.
//!
//! All-zero bars (pre-listing padding) are dropped so they never show up as
//! zero prices.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use histora_core::{HistoraError, OhlcvRecord, Page};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Envelope {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub time_from: Option<i64>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Bar {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volumefrom: f64,
    volumeto: f64,
}

impl Bar {
    /// Bars before a coin's listing are served with every price at zero.
    fn is_padding(&self) -> bool {
        self.open == 0.0 && self.high == 0.0 && self.low == 0.0 && self.close == 0.0
    }
}

fn instant(secs: i64) -> Result<DateTime<Utc>, HistoraError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| HistoraError::data(format!("timestamp {secs} out of range")))
}

impl Envelope {
    pub(crate) fn is_error(&self) -> bool {
        self.response == "Error"
    }

    pub(crate) fn into_page(self, connector: &str, symbol: &str) -> Result<Page, HistoraError> {
        if self.is_error() {
            return Err(HistoraError::provider(connector, symbol, self.message));
        }
        let bars: Vec<Bar> = if self.data.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(self.data).map_err(|e| {
                HistoraError::transport(connector, format!("decode Data for {symbol}: {e}"))
            })?
        };

        let total = bars.len();
        let records = bars
            .into_iter()
            .filter(|b| !b.is_padding())
            .map(|b| {
                Ok(OhlcvRecord {
                    time: instant(b.time)?,
                    open: b.open,
                    high: b.high,
                    low: b.low,
                    close: b.close,
                    volume_from: b.volumefrom,
                    volume_to: b.volumeto,
                })
            })
            .collect::<Result<Vec<_>, HistoraError>>()?;

        // TimeFrom covers the padding too, so only trust it for untouched pages.
        let time_from = match self.time_from {
            Some(secs) if !records.is_empty() && records.len() == total => Some(instant(secs)?),
            _ => None,
        };
        Ok(Page { records, time_from })
    }
}
