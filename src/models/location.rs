//! Location model for a resolved US postal code

use serde::{Deserialize, Serialize};

/// A postal code resolved to its place names and site URL slug
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Location {
    /// 5-digit US zip code
    pub postal_code: String,
    /// City name as the gazetteer spells it
    pub city: String,
    /// Full state name
    pub state: String,
    /// Two-letter USPS state abbreviation
    pub state_code: String,
    /// `<city-slug>/<zip>` path segment used by the forecast site
    pub url_slug: String,
}

impl Location {
    /// Create a new location, deriving the URL slug
    #[must_use]
    pub fn new(postal_code: String, city: String, state: String, state_code: String) -> Self {
        let url_slug = Self::slug(&city, &postal_code);
        Self {
            postal_code,
            city,
            state,
            state_code,
            url_slug,
        }
    }

    /// Lowercase the city, hyphenate spaces and append the postal code
    #[must_use]
    pub fn slug(city: &str, postal_code: &str) -> String {
        let city = city.trim().to_lowercase().replace(' ', "-");
        format!("{city}/{postal_code}")
    }

    /// Human readable "City, State"
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}
