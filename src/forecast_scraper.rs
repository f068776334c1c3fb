//! Forecast card scraping
//!
//! A daily forecast page lists one `<a class="forecast-list-card forecast-card">`
//! per day; today's card additionally carries the `today` class. Each card has
//! four sub-regions read by structural role:
//!
//! | region          | selector           | visible strings          |
//! |-----------------|--------------------|--------------------------|
//! | date            | `div.date`         | weekday, `m/d`           |
//! | temperatures    | `div.temps`        | high, `/low`             |
//! | summary phrase  | `span.phrase`      | phrase                   |
//! | precipitation   | `div.info.precip`  | ..., percentage          |
//!
//! The page also has one `a.recent-location-display` banner with the location
//! label and the current temperature.

use crate::fetcher::RawHtml;
use crate::models::forecast::parse_month_day;
use crate::models::{CurrentConditionsSnapshot, ForecastRecord, ScrapeResult};
use crate::{ForecastError, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

const DATE_REGION: &str = "div.date";
const TEMPS_REGION: &str = "div.temps";
const PHRASE_REGION: &str = "span.phrase";
const PRECIP_REGION: &str = "div.info.precip";
const RECENT_LOCATION: &str = "a.recent-location-display";

/// Which cards a scrape pass selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPass {
    /// Only today's card, plus the current-conditions banner
    Today,
    /// Every day card, today's included
    Others,
}

impl CardPass {
    #[must_use]
    pub fn card_selector(self) -> &'static str {
        match self {
            CardPass::Today => "a.forecast-list-card.forecast-card.today[href]",
            CardPass::Others => "a.forecast-list-card.forecast-card[href]",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CardPass::Today => "today",
            CardPass::Others => "others",
        }
    }
}

/// Scrape every card matched by `pass` into records dated with `year`
///
/// The year rolls over when a card's month drops below the previous card's,
/// so a forecast spanning New Year is dated correctly.
pub fn scrape_cards(html: &RawHtml, pass: CardPass, year: i32) -> Result<ScrapeResult> {
    let document = Html::parse_document(html.as_str());
    let cards = selector(pass.card_selector())?;

    let mut records = Vec::new();
    let mut year = year;
    let mut last_month: Option<u32> = None;

    for (index, card) in document.select(&cards).enumerate() {
        let fields = CardFields::extract(card, index)?;

        if let Some((month, _)) = parse_month_day(&fields.month_day) {
            if last_month.is_some_and(|last| month < last) {
                year += 1;
            }
            last_month = Some(month);
        }

        records.push(fields.into_record(year));
    }

    let snapshot = match pass {
        CardPass::Today => Some(scrape_snapshot(&document)?),
        CardPass::Others => None,
    };

    debug!("Pass '{}' scraped {} cards", pass.name(), records.len());
    Ok(ScrapeResult { records, snapshot })
}

/// Raw strings of one card before normalization
#[derive(Debug)]
struct CardFields {
    weekday: String,
    month_day: String,
    high: String,
    low: String,
    summary: String,
    precipitation: String,
}

impl CardFields {
    fn extract(card: ElementRef<'_>, index: usize) -> Result<Self> {
        let date = region_strings(card, DATE_REGION, index)?;
        let temps = region_strings(card, TEMPS_REGION, index)?;
        let phrase = region_strings(card, PHRASE_REGION, index)?;
        let precip = region_strings(card, PRECIP_REGION, index)?;

        let [weekday, month_day, ..] = date.as_slice() else {
            return Err(ForecastError::malformed_card(index, DATE_REGION));
        };
        let [high, low, ..] = temps.as_slice() else {
            return Err(ForecastError::malformed_card(index, TEMPS_REGION));
        };
        let Some(precipitation) = precip.last() else {
            return Err(ForecastError::malformed_card(index, PRECIP_REGION));
        };
        if phrase.is_empty() {
            return Err(ForecastError::malformed_card(index, PHRASE_REGION));
        }

        Ok(Self {
            weekday: weekday.clone(),
            month_day: month_day.clone(),
            high: strip_degrees(high),
            low: strip_degrees(low),
            summary: phrase.join(" "),
            precipitation: precipitation.clone(),
        })
    }

    fn into_record(self, year: i32) -> ForecastRecord {
        ForecastRecord {
            date: format!("{} {}/{}", self.weekday, self.month_day, year),
            high_low_temperature: format!("{}F {}F", self.high, self.low),
            summary: self.summary,
            precipitation: self.precipitation,
        }
    }
}

/// Visible strings of the first `css` match inside `card`, failing if absent
fn region_strings(card: ElementRef<'_>, css: &'static str, index: usize) -> Result<Vec<String>> {
    let region = selector(css)?;
    card.select(&region)
        .next()
        .map(stripped_strings)
        .ok_or_else(|| ForecastError::malformed_card(index, css))
}

fn scrape_snapshot(document: &Html) -> Result<CurrentConditionsSnapshot> {
    let banner = selector(RECENT_LOCATION)?;
    let strings = document
        .select(&banner)
        .next()
        .map(stripped_strings)
        .unwrap_or_default();

    if strings.is_empty() {
        warn!("Current conditions banner is missing or empty");
    }

    let mut strings = strings.into_iter();
    Ok(CurrentConditionsSnapshot {
        location_label: strings.next().unwrap_or_default(),
        current_temperature: strings.next().unwrap_or_default(),
    })
}

/// Trimmed, non-empty text nodes in document order
fn stripped_strings(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// "88°" -> "88", "/64°" -> "64"
fn strip_degrees(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '/' || c == '°' || c.is_whitespace())
        .to_string()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ForecastError::schema_mismatch(format!("Invalid CSS selector {css}: {e:?}")))
}
