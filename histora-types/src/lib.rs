//! Histora data transfer objects: OHLCV records, aligned tables, errors,
//! configuration primitives, and report envelopes.
#![warn(missing_docs)]

mod attribution;
mod config;
mod connector;
mod error;
mod market;
mod record;
mod reports;
mod table;

pub use attribution::{FetchTrace, PageTrace};
pub use config::{FailurePolicy, GapPolicy, HistoraConfig};
pub use connector::ConnectorKey;
pub use error::HistoraError;
pub use market::{Granularity, QuoteCurrency};
pub use record::{OhlcvRecord, RawBundle, SymbolSeries};
pub use reports::{DownloadReport, SymbolFailure};
pub use table::{AlignedTable, PriceColumn};
