//! Time-series utilities shared by connectors and the orchestrator.
//!
//! Modules include:
//! - `calendar`: fixed-frequency index construction
//! - `stitch`: chain provider pages into one chronological series
//! - `align`: map a series onto a calendar with forward fill
/// Forward-fill alignment of a series onto a calendar.
pub mod align;
/// Fixed-frequency calendar construction.
pub mod calendar;
/// Cursor-chained page accumulation.
pub mod stitch;
