//! Forecast pipeline
//!
//! Resolver -> browse page -> location id -> forecast page -> assembly.
//! Each step blocks until the previous one has returned; the first error
//! ends the run.

use crate::assembly::ForecastAssembly;
use crate::config::SiteConfig;
use crate::fetcher::PageFetcher;
use crate::gazetteer::Gazetteer;
use crate::identifier::{LocationIdentifier, extract_location_id};
use crate::location_resolver::LocationResolver;
use crate::models::{ForecastReport, Location};
use crate::Result;
use chrono::{Datelike, NaiveDate};
use tracing::{info, instrument};

pub struct ForecastPipeline<F: PageFetcher, G: Gazetteer> {
    fetcher: F,
    gazetteer: G,
    site: SiteConfig,
}

impl<F: PageFetcher, G: Gazetteer> ForecastPipeline<F, G> {
    pub fn new(fetcher: F, gazetteer: G, site: SiteConfig) -> Self {
        Self {
            fetcher,
            gazetteer,
            site,
        }
    }

    /// Scrape and merge the forecast for `postal_code`; `today` dates the cards
    #[instrument(skip(self))]
    pub fn run(&self, postal_code: &str, today: NaiveDate) -> Result<ForecastReport> {
        let location = LocationResolver::new(&self.gazetteer).resolve(postal_code)?;
        info!("Fetching forecast for {}", location.display_name());

        let browse_page = self.fetcher.fetch(&self.browse_url(&location))?;
        let location_id =
            extract_location_id(&browse_page, &location.city, self.site.script_index)?;

        let forecast_url = self.forecast_url(&location, &location_id);
        let forecast_page = self.fetcher.fetch(&forecast_url)?;

        let (snapshot, table) = ForecastAssembly::assemble(&forecast_page, today.year())?;
        info!(
            "Scraped {} forecast days for {}",
            table.len(),
            location.display_name()
        );

        Ok(ForecastReport {
            location,
            forecast_url,
            snapshot,
            table,
        })
    }

    /// State page listing every city with its location id
    #[must_use]
    pub fn browse_url(&self, location: &Location) -> String {
        format!(
            "{}/en/browse-locations/nam/us/{}",
            self.site.base_url,
            location.state_code.to_lowercase()
        )
    }

    #[must_use]
    pub fn forecast_url(&self, location: &Location, id: &LocationIdentifier) -> String {
        format!(
            "{}/en/us/{}/daily-weather-forecast/{}",
            self.site.base_url, location.url_slug, id
        )
    }
}
