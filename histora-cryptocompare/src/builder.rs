use url::Url;

use histora_core::{Granularity, HistoraError, QuoteCurrency};

use crate::CryptoCompareConnector;

/// Fluent builder for [`CryptoCompareConnector`].
///
/// String setters are parsed eagerly; the first parse failure is kept and
/// returned from [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct CryptoCompareBuilder {
    api_key: Option<String>,
    granularity: Granularity,
    quote: QuoteCurrency,
    base_url: Option<String>,
    http: Option<reqwest::Client>,
    pending: Option<HistoraError>,
}

impl CryptoCompareBuilder {
    /// API key sent as the `api_key` query parameter.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    /// Tick granularity served by the connector.
    #[must_use]
    pub const fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Granularity by name: `day`, `hour`, or `minute`.
    #[must_use]
    pub fn granularity_str(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(g) => self.granularity = g,
            Err(e) => self.keep_first(e),
        }
        self
    }

    /// Quote currency the assets are priced in.
    #[must_use]
    pub const fn quote(mut self, quote: QuoteCurrency) -> Self {
        self.quote = quote;
        self
    }

    /// Quote currency by code: `BTC` or `USD`.
    #[must_use]
    pub fn quote_str(mut self, code: &str) -> Self {
        match code.parse() {
            Ok(q) => self.quote = q,
            Err(e) => self.keep_first(e),
        }
        self
    }

    /// Override the API root, e.g. to point at a local mock server.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    fn keep_first(&mut self, e: HistoraError) {
        if self.pending.is_none() {
            self.pending = Some(e);
        }
    }

    /// Finish the connector.
    ///
    /// # Errors
    /// - `InvalidGranularity` / `UnsupportedCurrency` from the string setters.
    /// - `InvalidArg` when the base URL does not parse.
    pub fn build(self) -> Result<CryptoCompareConnector, HistoraError> {
        if let Some(e) = self.pending {
            return Err(e);
        }
        let raw = self
            .base_url
            .as_deref()
            .unwrap_or(CryptoCompareConnector::DEFAULT_BASE_URL);
        let mut base_url = Url::parse(raw)
            .map_err(|e| HistoraError::InvalidArg(format!("base url '{raw}': {e}")))?;
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(CryptoCompareConnector {
            http: self.http.unwrap_or_default(),
            base_url,
            api_key: self.api_key,
            granularity: self.granularity,
            quote: self.quote,
        })
    }
}
