use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{HistorySink, OutputFormat, expect_format};
use histora_core::{AlignedTable, HistoraError, RawBundle};

/// Sink writing both artifacts as pretty-printed JSON documents.
///
/// Unpopulated table cells serialize as `null`.
#[derive(Debug, Clone)]
pub struct JsonSink {
    raw: PathBuf,
    table: PathBuf,
}

impl JsonSink {
    /// Sink for a raw and an aligned output path.
    ///
    /// # Errors
    /// Returns `InvalidOutput` unless both paths end in `.json`.
    pub fn new(raw: impl Into<PathBuf>, table: impl Into<PathBuf>) -> Result<Self, HistoraError> {
        let (raw, table) = (raw.into(), table.into());
        expect_format(&raw, OutputFormat::Json)?;
        expect_format(&table, OutputFormat::Json)?;
        Ok(Self { raw, table })
    }

    fn write<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), HistoraError> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, value)
            .map_err(|e| HistoraError::Persistence(format!("{}: {e}", path.display())))?;
        out.flush()?;
        Ok(())
    }
}

impl HistorySink for JsonSink {
    fn write_table(&self, table: &AlignedTable) -> Result<(), HistoraError> {
        Self::write(&self.table, table)
    }

    fn write_raw(&self, raw: &RawBundle) -> Result<(), HistoraError> {
        Self::write(&self.raw, raw)
    }
}
