use std::sync::Arc;

use chrono::{DateTime, Utc};
use histora::{Granularity, HistoraError, HistoryProvider, QuoteCurrency};
use histora_cryptocompare::CryptoCompareConnector;
use histora_mock::MockConnector;

/// Run settings read from the environment.
#[derive(Debug, Clone)]
pub struct DemoSettings {
    /// `HISTORA_SYMBOLS`, comma separated. Default `BTC,ETH,LTC`.
    pub symbols: Vec<String>,
    /// `HISTORA_GRANULARITY`. Default `day`.
    pub granularity: Granularity,
    /// `HISTORA_QUOTE`. Default `USD`.
    pub quote: QuoteCurrency,
    /// `HISTORA_LOOKBACK`. Default 30.
    pub lookback: u32,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl DemoSettings {
    /// Read and validate settings.
    ///
    /// # Errors
    /// Returns the matching validation error for a bad granularity, quote
    /// currency, or lookback.
    pub fn from_env() -> Result<Self, HistoraError> {
        let symbols = var_or("HISTORA_SYMBOLS", "BTC,ETH,LTC")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let granularity = var_or("HISTORA_GRANULARITY", "day").parse()?;
        let quote = var_or("HISTORA_QUOTE", "USD").parse()?;
        let raw = var_or("HISTORA_LOOKBACK", "30");
        let lookback = raw
            .parse::<i64>()
            .ok()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
            .ok_or_else(|| HistoraError::InvalidLookback(raw.parse().unwrap_or(0)))?;
        Ok(Self {
            symbols,
            granularity,
            quote,
            lookback,
        })
    }
}

/// True when demos should avoid the network.
#[must_use]
pub fn use_mock() -> bool {
    std::env::var("HISTORA_DEMOS_USE_MOCK").is_ok()
}

/// Return a connector for demos together with the window end to use.
///
/// The mock answers from a fixed end instant so repeated runs are identical.
///
/// # Errors
/// Returns an error if the CryptoCompare connector cannot be built.
pub fn get_connector(
    settings: &DemoSettings,
) -> Result<(Arc<dyn HistoryProvider>, DateTime<Utc>), HistoraError> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        let end = DateTime::from_timestamp(MockConnector::DEFAULT_LATEST, 0).unwrap_or_default();
        let mock = MockConnector::new(settings.granularity, settings.quote);
        Ok((Arc::new(mock), end))
    } else {
        let cc = CryptoCompareConnector::builder()
            .api_key(std::env::var("CRYPTOCOMPARE_API_KEY").unwrap_or_default())
            .granularity(settings.granularity)
            .quote(settings.quote)
            .build()?;
        Ok((Arc::new(cc), Utc::now()))
    }
}
