//! Forecast records, the merged table and the current-conditions banner

use super::Location;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast day as scraped from a forecast card
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ForecastRecord {
    /// Weekday plus month/day/year, e.g. "Mon 6/12/2023"
    #[serde(rename = "Date")]
    pub date: String,
    /// High and low, e.g. "88F 64F"
    #[serde(rename = "High/Low Temperature")]
    pub high_low_temperature: String,
    /// Short weather phrase
    #[serde(rename = "Summary")]
    pub summary: String,
    /// Chance of precipitation, e.g. "25%"
    #[serde(rename = "Precipitation")]
    pub precipitation: String,
}

impl ForecastRecord {
    /// Calendar date of the `m/d/yyyy` part of the label
    #[must_use]
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let mut parts = self.date.split_whitespace().nth(1)?.split('/');
        let month = parts.next()?.parse::<u32>().ok()?;
        let day = parts.next()?.parse::<u32>().ok()?;
        let year = parts.next()?.parse::<i32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Parse the leading `month/day` of a `m/d` or `m/d/yyyy` label
#[must_use]
pub fn parse_month_day(label: &str) -> Option<(u32, u32)> {
    let mut parts = label.split('/');
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some((month, day))
}

/// The "current conditions" banner shown once per page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CurrentConditionsSnapshot {
    pub location_label: String,
    pub current_temperature: String,
}

/// Output of one scrape pass over the forecast page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeResult {
    pub records: Vec<ForecastRecord>,
    /// Present only for the today pass
    pub snapshot: Option<CurrentConditionsSnapshot>,
}

/// Ordered forecast rows, row 0 being today
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ForecastTable {
    rows: Vec<ForecastRecord>,
}

impl ForecastTable {
    /// Wrap already ordered rows
    #[must_use]
    pub fn new(rows: Vec<ForecastRecord>) -> Self {
        Self { rows }
    }

    /// Today's row
    #[must_use]
    pub fn today(&self) -> Option<&ForecastRecord> {
        self.rows.first()
    }

    #[must_use]
    pub fn rows(&self) -> &[ForecastRecord] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<ForecastRecord> {
        self.rows
    }
}

/// Everything a run produces for the export and notification steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastReport {
    pub location: Location,
    pub forecast_url: String,
    pub snapshot: CurrentConditionsSnapshot,
    pub table: ForecastTable,
}
