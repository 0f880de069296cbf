//! Re-export of foundational types from `histora-types`.
// Consolidated re-exports so downstream crates can depend on `histora-core` only

pub use histora_types::{AlignedTable, PriceColumn};
pub use histora_types::{ConnectorKey, HistoraError};
pub use histora_types::{DownloadReport, FetchTrace, PageTrace, SymbolFailure};
pub use histora_types::{FailurePolicy, GapPolicy, HistoraConfig};
pub use histora_types::{Granularity, QuoteCurrency};
pub use histora_types::{OhlcvRecord, RawBundle, SymbolSeries};
