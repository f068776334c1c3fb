//! Location identifier extraction
//!
//! The state browse page embeds every city of the state in an inline object
//! literal inside one of its `<script>` blocks:
//!
//! ```text
//! ..."Little Rock","id":"326862","localizedName":"Little Rock"...
//! ```
//!
//! The literal is not a standalone JSON document, so the id is recovered with
//! a text pattern over the script body at a fixed script index. If the site
//! moves that script, extraction fails instead of probing other blocks.

use crate::fetcher::RawHtml;
use crate::{ForecastError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Script block holding the city list on the browse page
pub const LOCATION_SCRIPT_INDEX: usize = 2;

/// Site-internal location id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationIdentifier(String);

impl LocationIdentifier {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of matching a city against the browse page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdLookup {
    Found(LocationIdentifier),
    NotFound,
    /// Distinct ids, sorted
    Ambiguous(Vec<String>),
}

/// Match `city` in the script block at `script_index`
pub fn find_location_id(html: &RawHtml, city: &str, script_index: usize) -> IdLookup {
    let Some(script) = script_text(html, script_index) else {
        debug!("Browse page has no script block at index {}", script_index);
        return IdLookup::NotFound;
    };

    let re = match city_pattern(city) {
        Ok(re) => re,
        Err(e) => {
            warn!("Cannot build location pattern for {}: {}", city, e);
            return IdLookup::NotFound;
        }
    };

    let ids: BTreeSet<String> = re
        .captures_iter(&script)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    let mut ids = ids.into_iter();
    match (ids.next(), ids.next()) {
        (None, _) => IdLookup::NotFound,
        (Some(id), None) => IdLookup::Found(LocationIdentifier(id)),
        (Some(first), Some(second)) => {
            let mut all = vec![first, second];
            all.extend(ids);
            IdLookup::Ambiguous(all)
        }
    }
}

/// Fallible form of [`find_location_id`]
pub fn extract_location_id(
    html: &RawHtml,
    city: &str,
    script_index: usize,
) -> Result<LocationIdentifier> {
    match find_location_id(html, city, script_index) {
        IdLookup::Found(id) => {
            debug!("Location id for {}: {}", city, id);
            Ok(id)
        }
        IdLookup::NotFound => Err(ForecastError::identifier_not_found(
            city,
            format!("no match in script block {script_index}"),
        )),
        IdLookup::Ambiguous(candidates) => Err(ForecastError::AmbiguousIdentifier {
            city: city.to_string(),
            candidates,
        }),
    }
}

/// `"<city>","id":"<id>","localizedName":"<city>"` with the id captured
fn city_pattern(city: &str) -> std::result::Result<Regex, regex::Error> {
    let city = regex::escape(city);
    Regex::new(&format!(r#""{city}","id":"([^"]+)","localizedName":"{city}""#))
}

fn script_text(html: &RawHtml, index: usize) -> Option<String> {
    let document = Html::parse_document(html.as_str());
    let selector = Selector::parse("script").ok()?;
    document
        .select(&selector)
        .nth(index)
        .map(|script| script.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browse_page(third_script: &str) -> RawHtml {
        RawHtml::new(format!(
            r#"<html><head>
            <script>window.dataLayer = [];</script>
            <script src="/static/app.js"></script>
            <script>{third_script}</script>
            </head><body></body></html>"#
        ))
    }

    const CITIES: &str = r#"var cities = [{"name":"Little Rock","id":"326862","localizedName":"Little Rock"},{"name":"Hot Springs","id":"326855","localizedName":"Hot Springs"}];"#;

    #[test]
    fn test_finds_id_in_third_script() {
        let html = browse_page(CITIES);
        let id = extract_location_id(&html, "Little Rock", LOCATION_SCRIPT_INDEX).unwrap();
        assert_eq!(id.as_str(), "326862");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = browse_page(CITIES);
        let first = extract_location_id(&html, "Hot Springs", LOCATION_SCRIPT_INDEX).unwrap();
        let second = extract_location_id(&html, "Hot Springs", LOCATION_SCRIPT_INDEX).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_city_absent_is_not_found() {
        let html = browse_page(CITIES);
        assert_eq!(
            find_location_id(&html, "Fayetteville", LOCATION_SCRIPT_INDEX),
            IdLookup::NotFound
        );
        let err = extract_location_id(&html, "Fayetteville", LOCATION_SCRIPT_INDEX).unwrap_err();
        assert!(matches!(err, ForecastError::IdentifierNotFound { .. }));
    }

    #[test]
    fn test_match_in_other_script_is_ignored() {
        let html = RawHtml::new(format!(
            "<html><head><script>{CITIES}</script><script></script><script></script></head></html>"
        ));
        assert_eq!(
            find_location_id(&html, "Little Rock", LOCATION_SCRIPT_INDEX),
            IdLookup::NotFound
        );
    }

    #[test]
    fn test_too_few_scripts_is_not_found() {
        let html = RawHtml::new(format!("<html><script>{CITIES}</script></html>"));
        assert_eq!(
            find_location_id(&html, "Little Rock", LOCATION_SCRIPT_INDEX),
            IdLookup::NotFound
        );
    }

    #[test]
    fn test_distinct_ids_are_ambiguous() {
        let html = browse_page(
            r#"[{"name":"Springfield","id":"111","localizedName":"Springfield"},{"name":"Springfield","id":"222","localizedName":"Springfield"}]"#,
        );
        assert_eq!(
            find_location_id(&html, "Springfield", LOCATION_SCRIPT_INDEX),
            IdLookup::Ambiguous(vec!["111".to_string(), "222".to_string()])
        );
        let err = extract_location_id(&html, "Springfield", LOCATION_SCRIPT_INDEX).unwrap_err();
        assert!(matches!(err, ForecastError::AmbiguousIdentifier { .. }));
    }

    #[test]
    fn test_repeated_identical_id_is_found() {
        let html = browse_page(&format!("{CITIES}{CITIES}"));
        let id = extract_location_id(&html, "Little Rock", LOCATION_SCRIPT_INDEX).unwrap();
        assert_eq!(id.as_str(), "326862");
    }

    #[test]
    fn test_city_pattern_builds_for_metacharacters() {
        for city in ["St. Louis", "Coeur d'Alene", "(a|b)*", r"C:\\Temp", "[x"] {
            let re = city_pattern(city).unwrap();
            let literal = format!(r#""{city}","id":"7","localizedName":"{city}""#);
            assert_eq!(&re.captures(&literal).unwrap()[1], "7");
        }
    }

    #[test]
    fn test_city_name_is_escaped() {
        let html = browse_page(r#"[{"name":"St. Louis","id":"349084","localizedName":"St. Louis"},{"name":"StXLouis","id":"1","localizedName":"StXLouis"}]"#);
        let id = extract_location_id(&html, "St. Louis", LOCATION_SCRIPT_INDEX).unwrap();
        assert_eq!(id.as_str(), "349084");
    }
}
