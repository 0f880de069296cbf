//! Pagination traces: which provider calls produced a symbol's series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One provider call made while paging backwards through a symbol's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTrace {
    /// Page size requested.
    pub requested: u32,
    /// Records actually returned.
    pub received: usize,
    /// Cursor sent with the call (`None` = most recent).
    pub cursor: Option<DateTime<Utc>>,
    /// Earliest timestamp of the returned page, which becomes the next cursor.
    pub earliest: Option<DateTime<Utc>>,
}

/// Pagination record for one symbol.
///
/// Behavior:
/// - Pages are listed in call order, newest first.
/// - `exhausted` is set when the provider returned an empty page before the
///   plan was complete, ending the chain early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTrace {
    /// Symbol the trace refers to.
    pub symbol: String,
    /// Connector that served the pages.
    pub connector: String,
    /// Calls made, newest first.
    pub pages: Vec<PageTrace>,
    /// True when pagination stopped before the plan was exhausted.
    pub exhausted: bool,
}

impl FetchTrace {
    /// Create an empty trace for a symbol.
    #[must_use]
    pub fn new(symbol: impl Into<String>, connector: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            connector: connector.into(),
            pages: vec![],
            exhausted: false,
        }
    }

    /// Record a page call.
    pub fn push(&mut self, page: PageTrace) {
        self.pages.push(page);
    }

    /// Total records received across pages, boundary duplicates included.
    #[must_use]
    pub fn received(&self) -> usize {
        self.pages.iter().map(|p| p.received).sum()
    }
}
