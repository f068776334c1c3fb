//! CSV export of the forecast table
//!
//! The file is rewritten from scratch on every run; earlier days are not kept.

use crate::models::{ForecastRecord, ForecastTable};
use crate::Result;
use std::fs;
use std::path::Path;
use tracing::info;

/// Column order of the exported file
pub const HEADER: [&str; 4] = ["Date", "High/Low Temperature", "Summary", "Precipitation"];

/// Overwrite `path` with the table, header row first
pub fn write_table(path: impl AsRef<Path>, table: &ForecastTable) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    if table.is_empty() {
        writer.write_record(HEADER)?;
    }
    writer.flush()?;

    info!("Wrote {} forecast rows to {}", table.len(), path.display());
    Ok(())
}

/// Read a table written by [`write_table`]
pub fn read_table(path: impl AsRef<Path>) -> Result<ForecastTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<ForecastRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ForecastTable::new(rows))
}
