//! histora-core
//!
//! Core types, traits, and utilities shared across the histora workspace.
//!
//! - `types`: re-exported records, tables, errors, and configuration.
//! - `connector`: the `HistoryProvider` trait and its page request/response types.
//! - `planner`: split a lookback window into provider-sized pages.
//! - `timeseries`: chain pages into a series and align it onto a calendar.
//!
//! Everything here is runtime-agnostic; only `HistoryProvider::fetch_page`
//! is async.
#![warn(missing_docs)]

/// Connector role trait and page request/response types.
pub mod connector;
/// Request planning for paginated history fetches.
pub mod planner;
/// Time-series utilities for stitching and alignment.
pub mod timeseries;
pub mod types;

pub use connector::{HistoryProvider, Page, PageRequest};
pub use planner::{FetchWindow, PagePlan, PageSpec, plan, plan_window};
pub use timeseries::align::{align_column, close_lookup, forward_fill};
pub use timeseries::calendar::calendar;
pub use timeseries::stitch::PageChain;
pub use types::*;
