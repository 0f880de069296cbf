//! Shared setup for the histora demo binaries.

pub mod common;
