use chrono::{DateTime, Utc};
use histora_types::Granularity;

/// Build the fixed-frequency calendar covering `[start, end]`.
///
/// Both bounds are floored onto the granularity grid first, so a daily
/// calendar always lands on UTC midnights. Returns an empty calendar when
/// `start > end`.
#[must_use]
pub fn calendar(
    granularity: Granularity,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let first = granularity.floor(start);
    let last = granularity.floor(end);
    let step = granularity.step();

    let mut out = Vec::new();
    let mut ts = first;
    while ts <= last {
        out.push(ts);
        match ts.checked_add_signed(step) {
            Some(next) => ts = next,
            None => break,
        }
    }
    out
}
