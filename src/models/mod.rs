//! Data models for zipweather
//!
//! - Location: a resolved postal code
//! - Forecast: scraped records, the merged table and the run report

pub mod forecast;
pub mod location;

pub use forecast::{
    CurrentConditionsSnapshot, ForecastRecord, ForecastReport, ForecastTable, ScrapeResult,
};
pub use location::Location;
