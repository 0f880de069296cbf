//! Persistence of raw series and aligned tables.

mod csv_sink;
mod json_sink;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

pub use csv_sink::{CsvSink, write_raw_csv, write_table_csv};
pub use json_sink::JsonSink;

use histora_core::{AlignedTable, DownloadReport, Granularity, HistoraError, RawBundle};

/// Writes run artifacts to durable storage.
pub trait HistorySink {
    /// Persist the calendar-aligned close-price table.
    ///
    /// # Errors
    /// Returns `Persistence` when the artifact cannot be written.
    fn write_table(&self, table: &AlignedTable) -> Result<(), HistoraError>;

    /// Persist the raw per-symbol records.
    ///
    /// # Errors
    /// Returns `Persistence` when the artifact cannot be written.
    fn write_raw(&self, raw: &RawBundle) -> Result<(), HistoraError>;

    /// Persist both artifacts of a report, raw records first.
    ///
    /// # Errors
    /// Returns the first write failure.
    fn write_report(&self, report: &DownloadReport) -> Result<(), HistoraError> {
        self.write_raw(&report.raw)?;
        self.write_table(&report.table)
    }
}

/// File formats a sink can produce, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON documents.
    Json,
}

impl OutputFormat {
    /// Pick a format from a path's extension (case-insensitive).
    ///
    /// # Errors
    /// Returns `InvalidOutput` for a missing or unsupported extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HistoraError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            Some(other) => Err(HistoraError::invalid_output(
                path.display().to_string(),
                format!("unsupported extension '.{other}'; use .csv or .json"),
            )),
            None => Err(HistoraError::invalid_output(
                path.display().to_string(),
                "missing file extension; use .csv or .json",
            )),
        }
    }
}

/// Open a file sink for a raw and an aligned output path of the same format.
///
/// # Errors
/// Returns `InvalidOutput` if either extension is unsupported or the two
/// paths disagree on format.
pub fn open_sink(
    raw: impl Into<PathBuf>,
    table: impl Into<PathBuf>,
) -> Result<Box<dyn HistorySink + Send + Sync>, HistoraError> {
    let (raw, table) = (raw.into(), table.into());
    let format = OutputFormat::from_path(&raw)?;
    if OutputFormat::from_path(&table)? != format {
        return Err(HistoraError::invalid_output(
            table.display().to_string(),
            format!("must use the same format as '{}'", raw.display()),
        ));
    }
    Ok(match format {
        OutputFormat::Csv => Box::new(CsvSink::new(raw, table)?),
        OutputFormat::Json => Box::new(JsonSink::new(raw, table)?),
    })
}

/// Text form of a timestamp in exported files: `YYYY-MM-DD` for daily data,
/// RFC 3339 in UTC otherwise.
#[must_use]
pub fn format_instant(granularity: Granularity, at: DateTime<Utc>) -> String {
    match granularity {
        Granularity::Day => at.format("%Y-%m-%d").to_string(),
        Granularity::Hour | Granularity::Minute => at.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn expect_format(path: &Path, want: OutputFormat) -> Result<(), HistoraError> {
    let got = OutputFormat::from_path(path)?;
    if got != want {
        return Err(HistoraError::invalid_output(
            path.display().to_string(),
            format!("expected a {want:?} file"),
        ));
    }
    Ok(())
}
