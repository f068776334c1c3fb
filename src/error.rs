//! Error types and handling for the forecast pipeline

use thiserror::Error;

/// Main error type for the scrape-and-normalize pipeline and its collaborators
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Postal code is malformed or unknown to the gazetteer
    #[error("Invalid postal code: {code}")]
    InvalidPostalCode { code: String },

    /// Transport failure or non-success HTTP status
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The browse page carries no location id for the city
    #[error("Location identifier not found for {city}: {message}")]
    IdentifierNotFound { city: String, message: String },

    /// The browse page carries several different ids for the city
    #[error("Ambiguous location identifier for {city}: {candidates:?}")]
    AmbiguousIdentifier {
        city: String,
        candidates: Vec<String>,
    },

    /// A forecast card is missing one of its sub-regions
    #[error("Malformed forecast card #{card}: {region}")]
    MalformedCard { card: usize, region: String },

    /// The today and multi-day passes cannot be reconciled
    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A forecast assembly step was applied in the wrong state
    #[error("Step '{step}' is not valid in state {state}")]
    OutOfOrder {
        state: &'static str,
        step: &'static str,
    },

    /// Writing or reading the forecast table failed
    #[error("Export error: {message}")]
    Export { message: String },

    /// Composing or sending the notification failed
    #[error("Notification error: {message}")]
    Notify { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ForecastError {
    /// Create a new invalid postal code error
    pub fn invalid_postal_code<S: Into<String>>(code: S) -> Self {
        Self::InvalidPostalCode { code: code.into() }
    }

    /// Create a new network error
    pub fn network<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new identifier-not-found error
    pub fn identifier_not_found<C: Into<String>, S: Into<String>>(city: C, message: S) -> Self {
        Self::IdentifierNotFound {
            city: city.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed card error
    pub fn malformed_card<S: Into<String>>(card: usize, region: S) -> Self {
        Self::MalformedCard {
            card,
            region: region.into(),
        }
    }

    /// Create a new schema mismatch error
    pub fn schema_mismatch<S: Into<String>>(message: S) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Create a new notification error
    pub fn notify<S: Into<String>>(message: S) -> Self {
        Self::Notify {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::InvalidPostalCode { code } => {
                format!("'{code}' is not a known 5-digit US zip code.")
            }
            ForecastError::Network { .. } => {
                "Unable to reach the weather site. Please check your internet connection."
                    .to_string()
            }
            ForecastError::IdentifierNotFound { city, .. } => {
                format!("Could not find {city} on the weather site. The page layout may have changed.")
            }
            ForecastError::AmbiguousIdentifier { city, .. } => {
                format!("The weather site lists several locations named {city}.")
            }
            ForecastError::MalformedCard { .. }
            | ForecastError::SchemaMismatch { .. }
            | ForecastError::OutOfOrder { .. } => {
                "The forecast page could not be read. The page layout may have changed."
                    .to_string()
            }
            ForecastError::Export { .. } | ForecastError::Io { .. } => {
                "Saving the forecast failed. Please check file permissions.".to_string()
            }
            ForecastError::Notify { message } => format!("Email was not sent: {message}"),
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::export(err.to_string())
    }
}
