use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::HistoraError;
use histora_types::{GapPolicy, Granularity, PriceColumn, SymbolSeries};

/// Close prices keyed by granularity-floored timestamp.
///
/// Duplicate timestamps (page boundaries) collapse; the later record wins.
#[must_use]
pub fn close_lookup(series: &SymbolSeries, granularity: Granularity) -> BTreeMap<DateTime<Utc>, f64> {
    series
        .records
        .iter()
        .map(|r| (granularity.floor(r.time), r.close))
        .collect()
}

/// Map a series onto `index`, carrying the previous cell forward over gaps.
///
/// - An exact (floored) timestamp match takes that record's close.
/// - A miss takes the previous calendar cell's value.
/// - A miss with no previous value stays `None`; it is never defaulted to zero.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use histora_core::{Granularity, OhlcvRecord, QuoteCurrency, SymbolSeries};
/// use histora_core::timeseries::align::forward_fill;
///
/// let day = |n: i64| DateTime::<Utc>::from_timestamp(n * 86_400, 0).unwrap();
/// let rec = |n: i64, close: f64| OhlcvRecord {
///     time: day(n), open: close, high: close, low: close, close,
///     volume_from: 0.0, volume_to: 0.0,
/// };
/// let series = SymbolSeries {
///     symbol: "BTC".into(),
///     quote: QuoteCurrency::Usd,
///     records: vec![rec(2, 20.0), rec(4, 40.0)],
/// };
/// let index: Vec<_> = (1..=5).map(day).collect();
/// let col = forward_fill(&series, Granularity::Day, &index);
/// assert_eq!(col.cells, vec![None, Some(20.0), Some(20.0), Some(40.0), Some(40.0)]);
/// ```
#[must_use]
pub fn forward_fill(
    series: &SymbolSeries,
    granularity: Granularity,
    index: &[DateTime<Utc>],
) -> PriceColumn {
    let lookup = close_lookup(series, granularity);
    let mut last: Option<f64> = None;
    let cells = index
        .iter()
        .map(|ts| {
            if let Some(close) = lookup.get(&granularity.floor(*ts)) {
                last = Some(*close);
            }
            last
        })
        .collect();
    PriceColumn {
        symbol: series.symbol.clone(),
        cells,
    }
}

/// [`forward_fill`] followed by the configured leading-gap policy.
///
/// # Errors
/// Returns `DataGap` under `GapPolicy::Reject` when the column starts with
/// cells that have no observation to carry forward.
pub fn align_column(
    series: &SymbolSeries,
    granularity: Granularity,
    index: &[DateTime<Utc>],
    policy: GapPolicy,
) -> Result<PriceColumn, HistoraError> {
    let column = forward_fill(series, granularity, index);
    if matches!(policy, GapPolicy::Reject)
        && let Some(i) = column.first_gap()
    {
        return Err(HistoraError::DataGap {
            symbol: column.symbol,
            at: index[i],
        });
    }
    Ok(column)
}
