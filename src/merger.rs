//! Record merging
//!
//! The multi-day pass also matches today's card. Its copy is dropped and the
//! dedicated today record takes row 0, so the table has as many rows as the
//! multi-day pass found cards.

use crate::models::{ForecastRecord, ForecastTable, ScrapeResult};
use crate::{ForecastError, Result};
use tracing::debug;

/// Merge the today pass into the multi-day pass
pub fn merge(today_pass: ScrapeResult, others_pass: ScrapeResult) -> Result<ForecastTable> {
    let today = single_today_record(today_pass.records)?;
    let mut rows = others_pass.records;

    let duplicate = rows
        .iter()
        .position(|record| record.date == today.date)
        .ok_or_else(|| {
            ForecastError::schema_mismatch(format!(
                "multi-day pass has no card for today ({})",
                today.date
            ))
        })?;

    rows.remove(duplicate);
    rows.insert(0, today);

    check_consecutive_days(&rows)?;

    debug!("Merged forecast table with {} rows", rows.len());
    Ok(ForecastTable::new(rows))
}

fn single_today_record(records: Vec<ForecastRecord>) -> Result<ForecastRecord> {
    let count = records.len();
    let mut records = records.into_iter();
    match (records.next(), records.next()) {
        (Some(today), None) => Ok(today),
        _ => Err(ForecastError::schema_mismatch(format!(
            "today pass yielded {count} records, expected 1"
        ))),
    }
}

/// One row per calendar day, ascending, no gaps
fn check_consecutive_days(rows: &[ForecastRecord]) -> Result<()> {
    let dates = rows
        .iter()
        .map(|row| {
            row.calendar_date().ok_or_else(|| {
                ForecastError::schema_mismatch(format!("unreadable date '{}'", row.date))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for pair in dates.windows(2) {
        if pair[0].succ_opt() != Some(pair[1]) {
            return Err(ForecastError::schema_mismatch(format!(
                "dates are not consecutive: {} then {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}
