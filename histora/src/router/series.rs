use chrono::{DateTime, Utc};

use crate::Histora;
use histora_core::{
    FetchTrace, HistoraError, PageChain, PagePlan, PageRequest, PriceColumn, SymbolSeries,
    align_column,
};

/// Everything one symbol contributes to a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolOutcome {
    /// Column aligned onto the run calendar.
    pub column: PriceColumn,
    /// Stitched raw series.
    pub series: SymbolSeries,
    /// Provider calls that produced the series.
    pub trace: FetchTrace,
}

impl Histora {
    /// Walk a page plan for one symbol and stitch the pages into one series.
    ///
    /// Behavior:
    /// - The first call uses the plan's anchor as cursor; every later call uses
    ///   the earliest timestamp of the previous page.
    /// - Calls are strictly sequential and never retried.
    /// - A page with nothing older than the cursor stops pagination; the trace
    ///   is marked exhausted when planned calls remain.
    ///
    /// # Errors
    /// Returns the first provider, timeout, or transport error unchanged, and
    /// `Data` when a page fails to move the cursor backwards. No partial
    /// series is returned for a failed symbol.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "histora::router",
            skip(self, plan),
            fields(symbol = %symbol, pages = plan.len()),
        )
    )]
    pub async fn fetch_series(
        &self,
        symbol: &str,
        plan: &PagePlan,
    ) -> Result<(SymbolSeries, FetchTrace), HistoraError> {
        let connector = &self.connector;
        let mut chain = PageChain::new(symbol, connector.quote(), plan.anchor);
        let mut trace = FetchTrace::new(symbol, connector.name());

        for (call, spec) in plan.pages.iter().enumerate() {
            let req = PageRequest {
                symbol: symbol.to_string(),
                size: spec.size,
                cursor: chain.cursor(),
            };
            let fut = connector.fetch_page(req);
            let page = match self.cfg.provider_timeout {
                Some(timeout) => {
                    Self::provider_call_with_timeout(connector.name(), symbol, timeout, fut)
                        .await?
                }
                None => fut.await?,
            };
            let entry = chain.push(spec.size, page)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                requested = entry.requested,
                received = entry.received,
                cursor = ?entry.cursor,
                earliest = ?entry.earliest,
                "page fetched"
            );
            trace.push(entry);

            if chain.is_exhausted() {
                if call + 1 == plan.len() {
                    break;
                }
                trace.exhausted = true;
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    symbol = %symbol,
                    calls = trace.pages.len(),
                    planned = plan.len(),
                    "provider history exhausted before the plan completed"
                );
                break;
            }
        }

        Ok((chain.finish(), trace))
    }

    /// Fetch one symbol and align it onto `calendar`.
    ///
    /// # Errors
    /// Everything [`fetch_series`](Self::fetch_series) returns, plus
    /// `DataGap` under `GapPolicy::Reject`.
    pub async fn assemble_symbol(
        &self,
        symbol: &str,
        plan: &PagePlan,
        calendar: &[DateTime<Utc>],
    ) -> Result<SymbolOutcome, HistoraError> {
        let (series, trace) = self.fetch_series(symbol, plan).await?;
        let column = align_column(
            &series,
            self.connector.granularity(),
            calendar,
            self.cfg.gap_policy,
        )?;
        Ok(SymbolOutcome {
            column,
            series,
            trace,
        })
    }
}
