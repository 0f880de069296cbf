//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What to do when one symbol's fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FailurePolicy {
    /// Abort the whole run on the first failing symbol, discarding the others.
    #[default]
    AbortRun,
    /// Keep going; successful symbols are reported alongside the failures.
    Continue,
}

/// How to treat calendar cells that have no observation and no prior value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum GapPolicy {
    /// Leave the cell unpopulated (`None`).
    #[default]
    Mark,
    /// Fail the symbol with `DataGap`.
    Reject,
}

/// Global configuration for the `Histora` orchestrator.
///
/// Granularity and quote currency are owned by the connector (one of each
/// per client instance) and are not configured here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoraConfig {
    /// Number of ticks to fetch per symbol.
    pub lookback: u32,
    /// Latest instant of the requested window. Required before a run.
    pub end: Option<DateTime<Utc>>,
    /// Optional page size override; never exceeds the connector's cap.
    pub page_cap: Option<u32>,
    /// Maximum number of symbols fetched concurrently (pages within a symbol
    /// stay sequential).
    pub concurrency: usize,
    /// Per-symbol failure handling.
    pub failure_policy: FailurePolicy,
    /// Leading-gap handling during alignment.
    pub gap_policy: GapPolicy,
    /// Optional timeout applied to each page call.
    pub provider_timeout: Option<Duration>,
}

impl Default for HistoraConfig {
    fn default() -> Self {
        Self {
            lookback: 30,
            end: None,
            page_cap: None,
            concurrency: 1,
            failure_policy: FailurePolicy::default(),
            gap_policy: GapPolicy::default(),
            provider_timeout: None,
        }
    }
}
