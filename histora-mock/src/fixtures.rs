//! Small builders for hand-written pages in tests.

use chrono::{DateTime, Utc};

use histora_core::{Granularity, OhlcvRecord, Page};

/// A flat bar whose open, high, low, and close all equal `close`.
#[must_use]
pub fn bar(time: DateTime<Utc>, close: f64) -> OhlcvRecord {
    OhlcvRecord {
        time,
        open: close,
        high: close,
        low: close,
        close,
        volume_from: 1.0,
        volume_to: close,
    }
}

/// Consecutive bars starting at `first`, one per tick, ascending.
#[must_use]
pub fn page(granularity: Granularity, first: DateTime<Utc>, closes: &[f64]) -> Page {
    let step = granularity.step();
    let mut ts = first;
    let mut records = Vec::with_capacity(closes.len());
    for close in closes {
        records.push(bar(ts, *close));
        ts += step;
    }
    Page::from_records(records)
}

/// A page built from explicit `(time, close)` pairs, in the given order.
#[must_use]
pub fn page_at(points: &[(DateTime<Utc>, f64)]) -> Page {
    Page::from_records(points.iter().map(|(t, c)| bar(*t, *c)).collect())
}
