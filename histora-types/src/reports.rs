//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::attribution::FetchTrace;
use crate::error::HistoraError;
use crate::record::RawBundle;
use crate::table::AlignedTable;

/// Result of a multi-symbol download.
///
/// `table` holds one column per successful symbol and `raw` the matching
/// series. Symbols that failed under `FailurePolicy::Continue` appear only in
/// `failures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadReport {
    /// Calendar-aligned close prices.
    pub table: AlignedTable,
    /// Raw per-symbol records.
    pub raw: RawBundle,
    /// Per-symbol pagination traces, in request order.
    pub traces: Vec<FetchTrace>,
    /// Non-fatal per-symbol failures.
    pub failures: Vec<SymbolFailure>,
}

/// A symbol whose fetch failed during a run that kept going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFailure {
    /// Requested symbol.
    pub symbol: String,
    /// Error that ended the symbol's fetch.
    pub error: HistoraError,
}

impl DownloadReport {
    /// True when every requested symbol produced a column.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Symbols that failed, in the order they were reported.
    pub fn failed_symbols(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.symbol.as_str())
    }
}
