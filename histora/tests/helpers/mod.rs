// Re-export helpers so tests can `use helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use histora::{Granularity, Histora, HistoraBuilder, QuoteCurrency};
use histora_mock::{ScriptController, ScriptedConnector};

pub use histora_mock::fixtures::{bar, page, page_at};

/// Common symbol constants used across tests.
pub const BTC: &str = "BTC";
pub const ETH: &str = "ETH";
pub const LTC: &str = "LTC";

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> DateTime<Utc> {
    let date = chrono::NaiveDate::from_ymd_opt(y, m, d).expect("invalid date");
    let naive = date
        .and_hms_opt(hh, mm, ss)
        .expect("invalid time components");
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

/// Midnight of 2024-01-01 plus `n` days.
pub fn day(n: i64) -> DateTime<Utc> {
    dt(2024, 1, 1, 0, 0, 0) + TimeDelta::days(n)
}

/// Top of 2024-01-01T00 plus `n` hours.
pub fn hour(n: i64) -> DateTime<Utc> {
    dt(2024, 1, 1, 0, 0, 0) + TimeDelta::hours(n)
}

/// Scripted connector plus a builder already wired to it.
pub fn scripted(granularity: Granularity, page_cap: u32) -> (HistoraBuilder, ScriptController) {
    let (conn, ctl) =
        ScriptedConnector::new_with_controller("scripted", granularity, QuoteCurrency::Usd, page_cap);
    (Histora::builder().with_connector(conn), ctl)
}

/// Deterministic mock connector behind a built orchestrator.
pub fn mock_histora(granularity: Granularity, page_cap: u32, lookback: u32, end: DateTime<Utc>) -> Histora {
    let mock = histora_mock::MockConnector::new(granularity, QuoteCurrency::Usd).with_page_cap(page_cap);
    Histora::builder()
        .with_connector(Arc::new(mock))
        .lookback(lookback)
        .end(end)
        .build()
        .expect("valid test config")
}
