use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the histora workspace.
///
/// Validation variants are raised before any network activity; provider,
/// transport, and data variants surface from the fetch path; `DataGap` and
/// `Persistence` come from alignment and sinks respectively.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoraError {
    /// The granularity string is not one of `day`, `hour`, or `minute`.
    #[error("invalid granularity '{0}': use 'day', 'hour' or 'minute'")]
    InvalidGranularity(String),

    /// The lookback count is below one tick.
    #[error("invalid lookback {0}: must be a positive integer")]
    InvalidLookback(i64),

    /// The quote currency is not supported by the provider.
    #[error("unsupported quote currency '{0}': use 'BTC' or 'USD'")]
    UnsupportedCurrency(String),

    /// The output path does not name a supported file kind.
    #[error("invalid output '{path}': {reason}")]
    InvalidOutput {
        /// Offending output path.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The provider answered with an error payload (rate limit, unknown symbol, outage).
    #[error("{connector} failed for {symbol}: {msg}")]
    Provider {
        /// Connector name that reported the failure.
        connector: String,
        /// Symbol being fetched.
        symbol: String,
        /// Provider-supplied message, verbatim.
        msg: String,
    },

    /// A single page call exceeded the configured timeout.
    #[error("provider timed out: {connector} for {symbol}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Symbol being fetched.
        symbol: String,
    },

    /// HTTP or decoding failure below the provider's own error envelope.
    #[error("{connector} transport error: {msg}")]
    Transport {
        /// Connector name.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Issues with the returned data (non-advancing cursor, bad timestamps, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// A calendar cell has neither an observation nor a prior value to carry forward.
    #[error("no data for {symbol} at {at}")]
    DataGap {
        /// Symbol whose column has the gap.
        symbol: String,
        /// Calendar instant of the first unpopulated cell.
        at: DateTime<Utc>,
    },

    /// Writing an artifact failed.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Every requested symbol failed; contains the individual failures.
    #[error("all symbols failed: {0:?}")]
    AllSymbolsFailed(Vec<HistoraError>),
}

impl HistoraError {
    /// Helper: build a `Provider` error.
    pub fn provider(
        connector: impl Into<String>,
        symbol: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Provider {
            connector: connector.into(),
            symbol: symbol.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Transport` error.
    pub fn transport(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            symbol: symbol.into(),
        }
    }

    /// Helper: build a `Data` error.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Helper: build an `InvalidOutput` error.
    pub fn invalid_output(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOutput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for malformed construction parameters, which the caller
    /// can fix by correcting inputs.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidGranularity(_)
                | Self::InvalidLookback(_)
                | Self::UnsupportedCurrency(_)
                | Self::InvalidOutput { .. }
                | Self::InvalidArg(_)
        )
    }

    /// Symbol the error is attributed to, when it carries one.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::Provider { symbol, .. }
            | Self::ProviderTimeout { symbol, .. }
            | Self::DataGap { symbol, .. } => Some(symbol),
            _ => None,
        }
    }

    /// Flatten nested `AllSymbolsFailed` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllSymbolsFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

impl From<std::io::Error> for HistoraError {
    fn from(e: std::io::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
