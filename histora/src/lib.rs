//! Histora fetches long OHLCV histories for crypto assets from page-capped
//! providers and lines them up on a shared calendar.
//!
//! Overview
//! - Plans the provider calls needed to cover `lookback` ticks ending at `end`
//!   (see `histora_core::planner`).
//! - Pages backwards through each symbol's history, anchoring every call at
//!   the earliest timestamp of the previous page, and stitches the pages into
//!   one ascending series.
//! - Aligns every series onto one fixed-frequency calendar with forward fill.
//! - Persists the raw series and the aligned table as CSV or JSON.
//!
//! Key behaviors and trade-offs
//! - Pages of one symbol are fetched sequentially; symbols may run
//!   concurrently up to `concurrency`, but columns are always inserted in
//!   request order.
//! - No retries or backoff. `FailurePolicy::AbortRun` stops at the first
//!   failing symbol; `FailurePolicy::Continue` reports failures next to the
//!   successful columns.
//! - Boundary records repeated by adjacent pages are kept in the raw series
//!   and collapse during alignment.
//! - Cells with no observation and nothing to carry forward stay `None`,
//!   never zero, unless `GapPolicy::Reject` turns them into `DataGap`.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use histora::{Histora, open_sink, HistorySink};
//! use histora_cryptocompare::CryptoCompareConnector;
//!
//! let cc = CryptoCompareConnector::builder()
//!     .api_key("...")
//!     .granularity_str("day")
//!     .quote_str("USD")
//!     .build()?;
//!
//! let histora = Histora::builder()
//!     .with_connector(Arc::new(cc))
//!     .lookback(365)
//!     .end(chrono::Utc::now())
//!     .build()?;
//!
//! let report = histora
//!     .download()
//!     .symbols(&["BTC", "ETH", "LTC"])?
//!     .run()
//!     .await?;
//!
//! open_sink("raw.csv", "aligned.csv")?.write_report(&report)?;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod persist;
mod router;

pub use core::{Histora, HistoraBuilder};
pub use persist::{
    CsvSink, HistorySink, JsonSink, OutputFormat, format_instant, open_sink, write_raw_csv,
    write_table_csv,
};
pub use router::download::DownloadBuilder;
pub use router::series::SymbolOutcome;

// Re-export core types for convenience
pub use histora_core::{
    AlignedTable, ConnectorKey, DownloadReport, FailurePolicy, FetchTrace, FetchWindow,
    GapPolicy, Granularity, HistoraConfig, HistoraError, HistoryProvider, OhlcvRecord, Page,
    PagePlan, PageRequest, PageSpec, PageTrace, PriceColumn, QuoteCurrency, RawBundle,
    SymbolFailure, SymbolSeries,
};
