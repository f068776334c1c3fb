//! Postal code reference data
//!
//! The resolver only needs "zip -> (city, state)". The bundled `zipcodes`
//! dataset answers that offline; `StaticGazetteer` serves tests and pinned
//! deployments.

use std::collections::HashMap;

/// City and state abbreviation for a zip code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceName {
    pub city: String,
    pub state_code: String,
}

/// Lookup keyed by 5-digit zip code, first match wins
pub trait Gazetteer {
    fn lookup(&self, postal_code: &str) -> Option<PlaceName>;
}

/// Gazetteer backed by the `zipcodes` crate dataset
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipcodesGazetteer;

impl Gazetteer for ZipcodesGazetteer {
    fn lookup(&self, postal_code: &str) -> Option<PlaceName> {
        // filter_by instead of matching: matching prints debug output
        let results = zipcodes::filter_by(
            vec![|z: &zipcodes::Zipcode| z.zip_code == postal_code],
            None,
        )
        .ok()?;
        let info = results.first()?;
        Some(PlaceName {
            city: info.city.clone(),
            state_code: info.state.clone(),
        })
    }
}

/// In-memory gazetteer
#[derive(Debug, Default, Clone)]
pub struct StaticGazetteer {
    entries: HashMap<String, PlaceName>,
}

impl StaticGazetteer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, postal_code: &str, city: &str, state_code: &str) -> Self {
        self.entries.insert(
            postal_code.to_string(),
            PlaceName {
                city: city.to_string(),
                state_code: state_code.to_string(),
            },
        );
        self
    }
}

impl Gazetteer for StaticGazetteer {
    fn lookup(&self, postal_code: &str) -> Option<PlaceName> {
        self.entries.get(postal_code).cloned()
    }
}

/// Full name for a USPS state or territory abbreviation
#[must_use]
pub fn state_name(code: &str) -> Option<&'static str> {
    let name = match code.to_ascii_uppercase().as_str() {
        "AL" => "Alabama",
        "AK" => "Alaska",
        "AZ" => "Arizona",
        "AR" => "Arkansas",
        "CA" => "California",
        "CO" => "Colorado",
        "CT" => "Connecticut",
        "DE" => "Delaware",
        "DC" => "District of Columbia",
        "FL" => "Florida",
        "GA" => "Georgia",
        "HI" => "Hawaii",
        "ID" => "Idaho",
        "IL" => "Illinois",
        "IN" => "Indiana",
        "IA" => "Iowa",
        "KS" => "Kansas",
        "KY" => "Kentucky",
        "LA" => "Louisiana",
        "ME" => "Maine",
        "MD" => "Maryland",
        "MA" => "Massachusetts",
        "MI" => "Michigan",
        "MN" => "Minnesota",
        "MS" => "Mississippi",
        "MO" => "Missouri",
        "MT" => "Montana",
        "NE" => "Nebraska",
        "NV" => "Nevada",
        "NH" => "New Hampshire",
        "NJ" => "New Jersey",
        "NM" => "New Mexico",
        "NY" => "New York",
        "NC" => "North Carolina",
        "ND" => "North Dakota",
        "OH" => "Ohio",
        "OK" => "Oklahoma",
        "OR" => "Oregon",
        "PA" => "Pennsylvania",
        "RI" => "Rhode Island",
        "SC" => "South Carolina",
        "SD" => "South Dakota",
        "TN" => "Tennessee",
        "TX" => "Texas",
        "UT" => "Utah",
        "VT" => "Vermont",
        "VA" => "Virginia",
        "WA" => "Washington",
        "WV" => "West Virginia",
        "WI" => "Wisconsin",
        "WY" => "Wyoming",
        "AS" => "American Samoa",
        "GU" => "Guam",
        "MP" => "Northern Mariana Islands",
        "PR" => "Puerto Rico",
        "VI" => "Virgin Islands",
        _ => return None,
    };
    Some(name)
}
