//! Request planning: split a lookback window into provider-sized pages.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::HistoraError;
use crate::timeseries::calendar::calendar;
use histora_types::Granularity;

/// The time window a run covers: `lookback` ticks ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    granularity: Granularity,
    lookback: u32,
    end: DateTime<Utc>,
    start: DateTime<Utc>,
}

impl FetchWindow {
    /// Build a window and derive its start instant.
    ///
    /// # Errors
    /// - `InvalidLookback` when `lookback` is zero.
    /// - `InvalidArg` when the start instant falls outside the representable range.
    pub fn new(
        granularity: Granularity,
        lookback: u32,
        end: DateTime<Utc>,
    ) -> Result<Self, HistoraError> {
        if lookback < 1 {
            return Err(HistoraError::InvalidLookback(i64::from(lookback)));
        }
        let span = granularity
            .seconds()
            .checked_mul(i64::from(lookback))
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                HistoraError::InvalidArg(format!("lookback {lookback} {granularity}s overflows"))
            })?;
        let start = end.checked_sub_signed(span).ok_or_else(|| {
            HistoraError::InvalidArg(format!(
                "start of {lookback} {granularity}s before {end} is out of range"
            ))
        })?;
        Ok(Self {
            granularity,
            lookback,
            end,
            start,
        })
    }

    /// Build a window from untyped boundary inputs (config files, CLI flags).
    ///
    /// # Errors
    /// - `InvalidGranularity` when `granularity` is not `day`, `hour`, or `minute`.
    /// - `InvalidLookback` when `lookback` is below one or does not fit a `u32`.
    pub fn parse(granularity: &str, lookback: i64, end: DateTime<Utc>) -> Result<Self, HistoraError> {
        let granularity: Granularity = granularity.parse()?;
        let lookback = u32::try_from(lookback)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(HistoraError::InvalidLookback(lookback))?;
        Self::new(granularity, lookback, end)
    }

    /// Tick granularity.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Number of ticks requested.
    #[must_use]
    pub const fn lookback(&self) -> u32 {
        self.lookback
    }

    /// Latest instant of the window.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `end - lookback * unit(granularity)`.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Fixed-frequency calendar spanning `[start, end]`.
    #[must_use]
    pub fn calendar(&self) -> Vec<DateTime<Utc>> {
        calendar(self.granularity, self.start, self.end)
    }
}

/// Size of one planned provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Ticks to request.
    pub size: u32,
}

/// Ordered provider calls needed to cover a window, newest page first.
///
/// Only the first call carries a pre-computed cursor (`anchor`); every later
/// cursor is taken from the previous page's earliest timestamp at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePlan {
    /// Window the plan covers.
    pub window: FetchWindow,
    /// Cursor for the first call; `None` means "most recent".
    pub anchor: Option<DateTime<Utc>>,
    /// Calls in order.
    pub pages: Vec<PageSpec>,
}

impl PagePlan {
    /// Page sizes in call order.
    #[must_use]
    pub fn sizes(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.size).collect()
    }

    /// Sum of page sizes; equals the window's lookback.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.pages.iter().map(|p| u64::from(p.size)).sum()
    }

    /// Number of provider calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True for a plan with no calls (never produced by [`plan`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Split `lookback` ticks ending at `end` into provider calls of at most `page_cap`.
///
/// Every page has `page_cap` ticks except the last, which carries the
/// remainder when `lookback` is not a multiple of `page_cap`.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use histora_core::{Granularity, planner::plan};
///
/// let end: DateTime<Utc> = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
/// let p = plan(Granularity::Hour, 4500, end, 2000).unwrap();
/// assert_eq!(p.sizes(), vec![2000, 2000, 500]);
///
/// let p = plan(Granularity::Hour, 4000, end, 2000).unwrap();
/// assert_eq!(p.sizes(), vec![2000, 2000]);
/// ```
///
/// # Errors
/// - `InvalidLookback` when `lookback` is zero.
/// - `InvalidArg` when `page_cap` is zero or the window start overflows.
pub fn plan(
    granularity: Granularity,
    lookback: u32,
    end: DateTime<Utc>,
    page_cap: u32,
) -> Result<PagePlan, HistoraError> {
    let window = FetchWindow::new(granularity, lookback, end)?;
    plan_window(window, page_cap)
}

/// Same as [`plan`] for an already validated window.
///
/// # Errors
/// Returns `InvalidArg` when `page_cap` is zero.
pub fn plan_window(window: FetchWindow, page_cap: u32) -> Result<PagePlan, HistoraError> {
    if page_cap == 0 {
        return Err(HistoraError::InvalidArg("page cap must be at least 1".into()));
    }
    let lookback = window.lookback();
    let calls = lookback.div_ceil(page_cap);
    let remainder = lookback % page_cap;

    let pages = (1..=calls)
        .map(|i| {
            let size = if i == calls && remainder > 0 {
                remainder
            } else {
                page_cap
            };
            PageSpec { size }
        })
        .collect();

    Ok(PagePlan {
        window,
        anchor: Some(window.end()),
        pages,
    })
}
