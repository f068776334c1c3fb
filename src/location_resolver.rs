//! Location Resolution Module
//!
//! Turns a 5-digit zip code into a `Location` through a `Gazetteer`.
//! No network access.

use crate::gazetteer::{Gazetteer, state_name};
use crate::models::Location;
use crate::{ForecastError, Result};
use tracing::debug;

/// Service for resolving postal codes
pub struct LocationResolver<'a, G: Gazetteer> {
    gazetteer: &'a G,
}

impl<'a, G: Gazetteer> LocationResolver<'a, G> {
    pub fn new(gazetteer: &'a G) -> Self {
        Self { gazetteer }
    }

    /// Resolve a postal code into a structured Location
    pub fn resolve(&self, postal_code: &str) -> Result<Location> {
        let postal_code = postal_code.trim();
        debug!("Resolving postal code: {}", postal_code);

        if !is_us_zip(postal_code) {
            return Err(ForecastError::invalid_postal_code(postal_code));
        }

        let place = self
            .gazetteer
            .lookup(postal_code)
            .ok_or_else(|| ForecastError::invalid_postal_code(postal_code))?;

        let state = state_name(&place.state_code)
            .map_or_else(|| place.state_code.clone(), str::to_string);

        let location = Location::new(
            postal_code.to_string(),
            place.city,
            state,
            place.state_code.to_ascii_uppercase(),
        );

        debug!(
            "Resolved {} to {} ({})",
            postal_code,
            location.display_name(),
            location.url_slug
        );

        Ok(location)
    }
}

/// Exactly five ASCII digits
fn is_us_zip(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::StaticGazetteer;
    use rstest::rstest;

    fn gazetteer() -> StaticGazetteer {
        StaticGazetteer::new()
            .with_entry("72204", "Little Rock", "AR")
            .with_entry("84101", "Salt Lake City", "UT")
            .with_entry("10001", "New York", "NY")
            .with_entry("96910", "Hagatna", "GU")
    }

    #[test]
    fn test_resolve_little_rock() {
        let gazetteer = gazetteer();
        let location = LocationResolver::new(&gazetteer).resolve("72204").unwrap();

        assert_eq!(location.city, "Little Rock");
        assert_eq!(location.state, "Arkansas");
        assert_eq!(location.state_code, "AR");
        assert_eq!(location.url_slug, "little-rock/72204");
    }

    #[rstest]
    #[case("72204")]
    #[case("84101")]
    #[case("10001")]
    #[case("96910")]
    fn test_slug_is_lowercase_without_spaces(#[case] zip: &str) {
        let gazetteer = gazetteer();
        let location = LocationResolver::new(&gazetteer).resolve(zip).unwrap();

        assert!(!location.url_slug.chars().any(char::is_uppercase));
        assert!(!location.url_slug.contains(' '));
        assert!(location.url_slug.ends_with(zip));
    }

    #[rstest]
    #[case("")]
    #[case("7220")]
    #[case("722045")]
    #[case("72a04")]
    #[case("SW1A 1AA")]
    #[case("99999")]
    fn test_invalid_postal_codes(#[case] zip: &str) {
        let gazetteer = gazetteer();
        let result = LocationResolver::new(&gazetteer).resolve(zip);
        assert!(matches!(
            result,
            Err(ForecastError::InvalidPostalCode { .. })
        ));
    }

    #[test]
    fn test_resolve_trims_input() {
        let gazetteer = gazetteer();
        let location = LocationResolver::new(&gazetteer).resolve(" 72204\n").unwrap();
        assert_eq!(location.postal_code, "72204");
    }
}
