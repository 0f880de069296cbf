use chrono::{DateTime, Utc};

use crate::HistoraError;
use crate::connector::Page;
use histora_types::{OhlcvRecord, PageTrace, QuoteCurrency, SymbolSeries};

/// Accumulates provider pages for one symbol while paging backwards in time.
///
/// Pages arrive newest first. Each accepted page moves the cursor to its
/// earliest timestamp; [`PageChain::finish`] emits the records oldest first.
/// Boundary records shared by adjacent pages are not deduplicated.
#[derive(Debug, Clone)]
pub struct PageChain {
    symbol: String,
    quote: QuoteCurrency,
    cursor: Option<DateTime<Utc>>,
    last_earliest: Option<DateTime<Utc>>,
    pages: Vec<Vec<OhlcvRecord>>,
    exhausted: bool,
}

impl PageChain {
    /// Start a chain whose first call uses `anchor` as its cursor.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        quote: QuoteCurrency,
        anchor: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quote,
            cursor: anchor,
            last_earliest: None,
            pages: Vec::new(),
            exhausted: false,
        }
    }

    /// Cursor for the next provider call.
    #[must_use]
    pub const fn cursor(&self) -> Option<DateTime<Utc>> {
        self.cursor
    }

    /// True once the provider had nothing older than the cursor (an empty page,
    /// or only the boundary record); no further calls are useful.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Accept the page returned for the current cursor and advance.
    ///
    /// Returns the trace entry for the call.
    ///
    /// A page whose earliest timestamp equals the previous page's holds only
    /// the shared boundary record; it marks the chain exhausted and adds nothing.
    ///
    /// # Errors
    /// Returns `Data` when the page's earliest timestamp is later than the
    /// previous page's.
    pub fn push(&mut self, requested: u32, page: Page) -> Result<PageTrace, HistoraError> {
        let sent = self.cursor;
        let earliest = page.earliest();

        let trace = PageTrace {
            requested,
            received: page.records.len(),
            cursor: sent,
            earliest,
        };

        if page.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(symbol = %self.symbol, cursor = ?sent, "provider returned an empty page; history exhausted");
            self.exhausted = true;
            return Ok(trace);
        }

        if let (Some(prev), Some(cur)) = (self.last_earliest, earliest) {
            if cur > prev {
                return Err(HistoraError::data(format!(
                    "cursor for {} moved forward: page starts at {cur}, previous page started at {prev}",
                    self.symbol
                )));
            }
            if cur == prev {
                // Only the inclusive boundary bar came back: nothing older exists.
                #[cfg(feature = "tracing")]
                tracing::debug!(symbol = %self.symbol, cursor = ?sent, "no records before cursor; history exhausted");
                self.exhausted = true;
                return Ok(trace);
            }
        }

        let mut records = page.records;
        records.sort_by_key(|r| r.time);
        self.pages.push(records);
        self.last_earliest = earliest;
        self.cursor = earliest;
        Ok(trace)
    }

    /// Concatenate accepted pages into one ascending series.
    #[must_use]
    pub fn finish(self) -> SymbolSeries {
        let total = self.pages.iter().map(Vec::len).sum();
        let mut records = Vec::with_capacity(total);
        for page in self.pages.into_iter().rev() {
            records.extend(page);
        }
        SymbolSeries {
            symbol: self.symbol,
            quote: self.quote,
            records,
        }
    }
}
