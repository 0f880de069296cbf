use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;

use super::{HistorySink, OutputFormat, expect_format, format_instant};
use histora_core::{AlignedTable, HistoraError, RawBundle};

fn csv_err(e: csv::Error) -> HistoraError {
    HistoraError::Persistence(e.to_string())
}

/// Raw records as CSV: `ticker,priceDate,high,low,open,close,volumeFrom,volumeTo`.
///
/// Series are written in bundle order, records in stored order.
///
/// # Errors
/// Returns `Persistence` on any write failure.
pub fn write_raw_csv<W: Write>(out: W, raw: &RawBundle) -> Result<(), HistoraError> {
    let mut writer = Writer::from_writer(out);
    writer
        .write_record([
            "ticker",
            "priceDate",
            "high",
            "low",
            "open",
            "close",
            "volumeFrom",
            "volumeTo",
        ])
        .map_err(csv_err)?;

    for series in &raw.series {
        let ticker = series.ticker();
        for r in &series.records {
            writer
                .write_record([
                    ticker.clone(),
                    format_instant(raw.granularity, r.time),
                    r.high.to_string(),
                    r.low.to_string(),
                    r.open.to_string(),
                    r.close.to_string(),
                    r.volume_from.to_string(),
                    r.volume_to.to_string(),
                ])
                .map_err(csv_err)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Aligned table as CSV: a `time` column followed by one column per symbol.
///
/// Unpopulated cells are written as empty fields.
///
/// # Errors
/// Returns `Persistence` on any write failure.
pub fn write_table_csv<W: Write>(out: W, table: &AlignedTable) -> Result<(), HistoraError> {
    let mut writer = Writer::from_writer(out);
    let header: Vec<&str> = std::iter::once("time").chain(table.symbols()).collect();
    writer.write_record(&header).map_err(csv_err)?;

    for (at, cells) in table.rows() {
        let row = std::iter::once(format_instant(table.granularity(), at)).chain(
            cells
                .into_iter()
                .map(|c| c.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(row).map_err(csv_err)?;
    }

    writer.flush()?;
    Ok(())
}

/// Sink writing both artifacts as CSV files.
#[derive(Debug, Clone)]
pub struct CsvSink {
    raw: PathBuf,
    table: PathBuf,
}

impl CsvSink {
    /// Sink for a raw and an aligned output path.
    ///
    /// # Errors
    /// Returns `InvalidOutput` unless both paths end in `.csv`.
    pub fn new(raw: impl Into<PathBuf>, table: impl Into<PathBuf>) -> Result<Self, HistoraError> {
        let (raw, table) = (raw.into(), table.into());
        expect_format(&raw, OutputFormat::Csv)?;
        expect_format(&table, OutputFormat::Csv)?;
        Ok(Self { raw, table })
    }

    /// Raw output path.
    #[must_use]
    pub fn raw_path(&self) -> &Path {
        &self.raw
    }

    /// Aligned output path.
    #[must_use]
    pub fn table_path(&self) -> &Path {
        &self.table
    }
}

impl HistorySink for CsvSink {
    fn write_table(&self, table: &AlignedTable) -> Result<(), HistoraError> {
        write_table_csv(File::create(&self.table)?, table)
    }

    fn write_raw(&self, raw: &RawBundle) -> Result<(), HistoraError> {
        write_raw_csv(File::create(&self.raw)?, raw)
    }
}
