use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::StreamExt;

use crate::Histora;
use crate::router::series::SymbolOutcome;
use histora_core::{
    AlignedTable, DownloadReport, FailurePolicy, HistoraError, RawBundle, SymbolFailure,
};

/// Builder to orchestrate a multi-symbol history download.
pub struct DownloadBuilder<'a> {
    pub(crate) histora: &'a Histora,
    pub(crate) symbols: Vec<String>,
    pub(crate) lookback: Option<u32>,
    pub(crate) end: Option<DateTime<Utc>>,
}

fn check_symbol(symbol: &str) -> Result<(), HistoraError> {
    if symbol.trim().is_empty() {
        return Err(HistoraError::InvalidArg(
            "symbols must be non-empty strings".into(),
        ));
    }
    Ok(())
}

impl<'a> DownloadBuilder<'a> {
    /// Create a new builder bound to a `Histora` instance.
    ///
    /// Starts with an empty symbol list; lookback and end default to the
    /// orchestrator's configuration.
    #[must_use]
    pub const fn new(histora: &'a Histora) -> Self {
        Self {
            histora,
            symbols: Vec::new(),
            lookback: None,
            end: None,
        }
    }

    /// Replace the symbol list.
    ///
    /// # Errors
    /// Returns an error if a symbol is empty or appears twice.
    pub fn symbols<S: AsRef<str>>(mut self, symbols: &[S]) -> Result<Self, HistoraError> {
        let mut seen = HashSet::new();
        for s in symbols {
            let s = s.as_ref();
            check_symbol(s)?;
            if !seen.insert(s) {
                return Err(HistoraError::InvalidArg(format!(
                    "duplicate symbol '{s}' in symbols list"
                )));
            }
        }

        self.symbols = symbols.iter().map(|s| s.as_ref().to_string()).collect();
        Ok(self)
    }

    /// Append one symbol.
    ///
    /// # Errors
    /// Returns an error if the symbol is empty or already in the list.
    pub fn add_symbol(mut self, symbol: impl Into<String>) -> Result<Self, HistoraError> {
        let symbol = symbol.into();
        check_symbol(&symbol)?;
        if self.symbols.contains(&symbol) {
            return Err(HistoraError::InvalidArg(format!(
                "duplicate symbol '{symbol}' already exists in symbols list"
            )));
        }

        self.symbols.push(symbol);
        Ok(self)
    }

    /// Override the configured lookback for this run.
    #[must_use]
    pub const fn lookback(mut self, ticks: u32) -> Self {
        self.lookback = Some(ticks);
        self
    }

    /// Override the configured end instant for this run.
    #[must_use]
    pub const fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Fetch every symbol, align the series onto one calendar, and report.
    ///
    /// Behavior:
    /// - Validation (symbols, lookback, end, page plan) happens before any
    ///   provider call.
    /// - Up to `concurrency` symbols are in flight at once; columns are
    ///   inserted by this task alone, in request order.
    /// - `FailurePolicy::AbortRun` returns the first failing symbol's error and
    ///   drops in-flight work. `FailurePolicy::Continue` records failures in the
    ///   report and keeps the remaining columns.
    ///
    /// # Errors
    /// Validation errors; the first symbol error under `AbortRun`;
    /// `AllSymbolsFailed` under `Continue` when no symbol succeeds.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "histora::download::run",
            skip(self),
            fields(symbols = self.symbols.len()),
        )
    )]
    pub async fn run(self) -> Result<DownloadReport, HistoraError> {
        if self.symbols.is_empty() {
            return Err(HistoraError::InvalidArg(
                "no symbols specified for download".into(),
            ));
        }

        let mut seen = HashSet::new();
        for s in &self.symbols {
            check_symbol(s)?;
            if !seen.insert(s.as_str()) {
                return Err(HistoraError::InvalidArg(format!(
                    "duplicate symbol '{s}' detected in symbols list"
                )));
            }
        }

        let histora = self.histora;
        let cfg = histora.config();
        let lookback = self.lookback.unwrap_or(cfg.lookback);
        let end = self.end.or(cfg.end).ok_or_else(|| {
            HistoraError::InvalidArg("an end timestamp is required for download".into())
        })?;

        let plan = histora.plan(lookback, end)?;
        let calendar = plan.window.calendar();
        let granularity = plan.window.granularity();
        let mut table = AlignedTable::new(granularity, calendar.clone())?;
        let mut raw = RawBundle::new(granularity);
        let mut traces = Vec::with_capacity(self.symbols.len());
        let mut failures: Vec<SymbolFailure> = Vec::new();

        let plan = &plan;
        let calendar = calendar.as_slice();
        let tasks = self.symbols.iter().map(move |symbol| async move {
            let outcome = histora.assemble_symbol(symbol, plan, calendar).await;
            (symbol.clone(), outcome)
        });
        let mut results = futures::stream::iter(tasks).buffered(cfg.concurrency.max(1));

        while let Some((symbol, outcome)) = results.next().await {
            match outcome {
                Ok(SymbolOutcome {
                    column,
                    series,
                    trace,
                }) => {
                    table.insert_column(column)?;
                    raw.series.push(series);
                    traces.push(trace);
                }
                Err(error) => match cfg.failure_policy {
                    FailurePolicy::Continue => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(symbol = %symbol, error = %error, "symbol failed; continuing");
                        failures.push(SymbolFailure { symbol, error });
                    }
                    _ => return Err(error),
                },
            }
        }

        if table.columns().is_empty() {
            return Err(HistoraError::AllSymbolsFailed(
                failures.into_iter().map(|f| f.error).collect(),
            ));
        }

        Ok(DownloadReport {
            table,
            raw,
            traces,
            failures,
        })
    }
}

impl Histora {
    /// Begin building a multi-symbol download.
    ///
    /// Typical usage: chain `symbols`, optionally `lookback`/`end`, then call `run()`.
    #[must_use]
    pub const fn download(&'_ self) -> DownloadBuilder<'_> {
        DownloadBuilder::new(self)
    }
}
