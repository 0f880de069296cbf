//! histora-cryptocompare
//!
//! Connector that implements `HistoryProvider` on top of CryptoCompare's
//! `data/histominute`, `data/histohour`, and `data/histoday` endpoints.
//!
//! One connector instance serves one granularity and one quote currency.
//! Pages are capped at [`CryptoCompareConnector::PAGE_CAP`] points; the
//! provider returns data at or before `toTs`, inclusive.
#![warn(missing_docs)]

mod builder;
mod wire;

pub use builder::CryptoCompareBuilder;

use async_trait::async_trait;
use url::Url;

use histora_core::{
    Granularity, HistoraError, HistoryProvider, Page, PageRequest, QuoteCurrency,
    connector::ConnectorKey,
};

use wire::Envelope;

/// CryptoCompare history connector.
#[derive(Debug, Clone)]
pub struct CryptoCompareConnector {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) api_key: Option<String>,
    pub(crate) granularity: Granularity,
    pub(crate) quote: QuoteCurrency,
}

impl CryptoCompareConnector {
    /// Static connector key used in errors and traces.
    pub const KEY: ConnectorKey = ConnectorKey::new("histora-cryptocompare");

    /// Free-tier maximum number of points per call.
    pub const PAGE_CAP: u32 = 2000;

    /// Production API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://min-api.cryptocompare.com/";

    /// Start configuring a connector.
    #[must_use]
    pub fn builder() -> CryptoCompareBuilder {
        CryptoCompareBuilder::default()
    }

    /// Connector against the production API with a fresh HTTP client.
    ///
    /// # Errors
    /// Only fails if the built-in base URL is rejected, which does not happen in practice.
    pub fn new_with_key(
        api_key: impl Into<String>,
        granularity: Granularity,
        quote: QuoteCurrency,
    ) -> Result<Self, HistoraError> {
        Self::builder()
            .api_key(api_key)
            .granularity(granularity)
            .quote(quote)
            .build()
    }

    /// Request URL for one page.
    ///
    /// ```
    /// use histora_core::{Granularity, PageRequest, QuoteCurrency};
    /// use histora_cryptocompare::CryptoCompareConnector;
    ///
    /// let cc = CryptoCompareConnector::new_with_key("k", Granularity::Hour, QuoteCurrency::Usd).unwrap();
    /// let url = cc
    ///     .history_url(&PageRequest { symbol: "BTC".into(), size: 2000, cursor: None })
    ///     .unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://min-api.cryptocompare.com/data/histohour?fsym=BTC&tsym=USD&limit=2000&api_key=k"
    /// );
    /// ```
    ///
    /// # Errors
    /// Returns `InvalidArg` if the endpoint path cannot be joined onto the base URL.
    pub fn history_url(&self, req: &PageRequest) -> Result<Url, HistoraError> {
        let mut url = self
            .base_url
            .join(&format!("data/histo{}", self.granularity))
            .map_err(|e| HistoraError::InvalidArg(format!("history endpoint: {e}")))?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("fsym", &req.symbol)
                .append_pair("tsym", self.quote.code())
                .append_pair("limit", &req.size.to_string());
            if let Some(cursor) = req.cursor {
                q.append_pair("toTs", &cursor.timestamp().to_string());
            }
            if let Some(key) = &self.api_key {
                q.append_pair("api_key", key);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl HistoryProvider for CryptoCompareConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "CryptoCompare"
    }

    fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn quote(&self) -> QuoteCurrency {
        self.quote
    }

    fn page_cap(&self) -> u32 {
        Self::PAGE_CAP
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "histora_cryptocompare::fetch_page",
            skip(self, req),
            fields(symbol = %req.symbol, size = req.size, to_ts = ?req.cursor.map(|c| c.timestamp())),
        )
    )]
    async fn fetch_page(&self, req: PageRequest) -> Result<Page, HistoraError> {
        if req.size == 0 || req.size > Self::PAGE_CAP {
            return Err(HistoraError::InvalidArg(format!(
                "page size {} outside 1..={}",
                req.size,
                Self::PAGE_CAP
            )));
        }
        let name = self.name();
        let url = self.history_url(&req)?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| HistoraError::transport(name, e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| HistoraError::transport(name, e.to_string()))?;

        let page = match serde_json::from_str::<Envelope>(&body) {
            Ok(env) if env.is_error() || status.is_success() => env.into_page(name, &req.symbol)?,
            Ok(_) => return Err(HistoraError::transport(name, format!("HTTP {status}"))),
            Err(_) if !status.is_success() => {
                return Err(HistoraError::transport(name, format!("HTTP {status}")));
            }
            Err(e) => {
                return Err(HistoraError::transport(
                    name,
                    format!("decode response for {}: {e}", req.symbol),
                ));
            }
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(received = page.records.len(), earliest = ?page.earliest(), "page decoded");
        Ok(page)
    }
}
