//! `zipweather` - daily forecast scraping for a US zip code
//!
//! This library resolves a zip code to a forecast page, scrapes the daily
//! forecast cards into one ordered table, and provides the CSV export and
//! email steps that consume it.

pub mod assembly;
pub mod config;
pub mod email;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod forecast_scraper;
pub mod gazetteer;
pub mod identifier;
pub mod location_resolver;
pub mod logging;
pub mod merger;
pub mod models;
pub mod pipeline;

// Re-export core types for public API
pub use assembly::ForecastAssembly;
pub use config::AppConfig;
pub use email::{Notifier, SmtpNotifier};
pub use error::ForecastError;
pub use fetcher::{HttpFetcher, PageFetcher, RawHtml};
pub use forecast_scraper::{CardPass, scrape_cards};
pub use gazetteer::{Gazetteer, StaticGazetteer, ZipcodesGazetteer};
pub use identifier::{IdLookup, LocationIdentifier, extract_location_id, find_location_id};
pub use location_resolver::LocationResolver;
pub use merger::merge;
pub use models::{
    CurrentConditionsSnapshot, ForecastRecord, ForecastReport, ForecastTable, Location,
    ScrapeResult,
};
pub use pipeline::ForecastPipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;
