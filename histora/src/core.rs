use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use histora_core::{
    FailurePolicy, GapPolicy, HistoraConfig, HistoraError, HistoryProvider, PagePlan, planner,
};

/// Orchestrator that drives paginated history fetches through one connector.
pub struct Histora {
    pub(crate) connector: Arc<dyn HistoryProvider>,
    pub(crate) cfg: HistoraConfig,
}

/// Builder for constructing a `Histora` orchestrator with custom configuration.
pub struct HistoraBuilder {
    connector: Option<Arc<dyn HistoryProvider>>,
    cfg: HistoraConfig,
}

impl Default for HistoraBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoraBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Defaults: 30 ticks of lookback, no end instant, the connector's own page
    /// cap, one symbol at a time, abort on the first failure, leading gaps
    /// left unpopulated, no per-call timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: HistoraConfig::default(),
        }
    }

    /// Register the connector. A second call replaces the first.
    ///
    /// The connector fixes the run's granularity and quote currency.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn HistoryProvider>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration, e.g. one deserialized from a file.
    #[must_use]
    pub fn config(mut self, cfg: HistoraConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Number of ticks to fetch per symbol.
    #[must_use]
    pub const fn lookback(mut self, ticks: u32) -> Self {
        self.cfg.lookback = ticks;
        self
    }

    /// Latest instant of the window.
    #[must_use]
    pub const fn end(mut self, end: DateTime<Utc>) -> Self {
        self.cfg.end = Some(end);
        self
    }

    /// Request smaller pages than the connector allows.
    ///
    /// Values above the connector's cap are clamped to it.
    #[must_use]
    pub const fn page_cap(mut self, cap: u32) -> Self {
        self.cfg.page_cap = Some(cap);
        self
    }

    /// Maximum number of symbols fetched at once. Pages of one symbol are
    /// always fetched one after another.
    #[must_use]
    pub const fn concurrency(mut self, n: usize) -> Self {
        self.cfg.concurrency = n;
        self
    }

    /// Select what happens when one symbol fails.
    #[must_use]
    pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.cfg.failure_policy = policy;
        self
    }

    /// Select how leading gaps in aligned columns are treated.
    #[must_use]
    pub const fn gap_policy(mut self, policy: GapPolicy) -> Self {
        self.cfg.gap_policy = policy;
        self
    }

    /// Bound each provider call; an expired call fails with `ProviderTimeout`.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = Some(timeout);
        self
    }

    /// Build the `Histora` orchestrator.
    ///
    /// # Errors
    /// - `InvalidArg` if no connector is registered, `concurrency` is zero, or
    ///   the page cap override is zero.
    /// - `InvalidLookback` if `lookback` is zero.
    pub fn build(self) -> Result<Histora, HistoraError> {
        let Some(connector) = self.connector else {
            return Err(HistoraError::InvalidArg(
                "no connector registered; add one via with_connector(...)".to_string(),
            ));
        };
        if self.cfg.lookback < 1 {
            return Err(HistoraError::InvalidLookback(i64::from(self.cfg.lookback)));
        }
        if self.cfg.concurrency == 0 {
            return Err(HistoraError::InvalidArg(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.cfg.page_cap == Some(0) {
            return Err(HistoraError::InvalidArg(
                "page cap must be at least 1".to_string(),
            ));
        }
        Ok(Histora {
            connector,
            cfg: self.cfg,
        })
    }
}

impl Histora {
    /// Start building a new `Histora` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use histora::{Histora, FailurePolicy};
    /// use histora_cryptocompare::CryptoCompareConnector;
    ///
    /// let cc = CryptoCompareConnector::builder()
    ///     .api_key(std::env::var("CRYPTOCOMPARE_API_KEY")?)
    ///     .granularity_str("hour")
    ///     .quote_str("USD")
    ///     .build()?;
    ///
    /// let histora = Histora::builder()
    ///     .with_connector(Arc::new(cc))
    ///     .lookback(4500)
    ///     .end(chrono::Utc::now())
    ///     .failure_policy(FailurePolicy::Continue)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> HistoraBuilder {
        HistoraBuilder::new()
    }

    /// The registered connector.
    #[must_use]
    pub fn connector(&self) -> &Arc<dyn HistoryProvider> {
        &self.connector
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HistoraConfig {
        &self.cfg
    }

    /// Page size used for planning: the override clamped to the connector's cap.
    #[must_use]
    pub fn effective_page_cap(&self) -> u32 {
        let cap = self.connector.page_cap();
        self.cfg.page_cap.map_or(cap, |c| c.min(cap))
    }

    /// Plan the provider calls for `lookback` ticks ending at `end`.
    ///
    /// # Errors
    /// Propagates planner validation errors.
    pub fn plan(&self, lookback: u32, end: DateTime<Utc>) -> Result<PagePlan, HistoraError> {
        planner::plan(
            self.connector.granularity(),
            lookback,
            end,
            self.effective_page_cap(),
        )
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "histora::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                symbol = symbol,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        symbol: &str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, HistoraError>
    where
        Fut: core::future::Future<Output = Result<T, HistoraError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(HistoraError::provider_timeout(connector_name, symbol)))
    }
}
