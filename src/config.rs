//! Configuration management for zipweather
//!
//! Handles loading configuration from a TOML file and `ZIPWEATHER_`
//! environment variables, and validates the result.

use crate::identifier::LOCATION_SCRIPT_INDEX;
use anyhow::{Context, Result, bail};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Forecast site settings
    pub site: SiteConfig,
    /// CSV output settings
    pub output: OutputConfig,
    /// Daily email settings
    pub email: EmailConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Forecast site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the forecast site
    pub base_url: String,
    /// Client identity sent with every request
    pub user_agent: String,
    /// Script block on the browse page that lists the cities
    pub script_index: usize,
    /// Request timeout in seconds; unset means the client default
    pub timeout_seconds: Option<u32>,
}

/// CSV output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File overwritten on every run
    pub csv_path: String,
}

/// Daily email settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP relay host
    pub relay: String,
    /// Sender address, also the SMTP username
    pub sender: String,
    /// Display name of the sender
    pub sender_name: String,
    /// Environment variable holding the SMTP password
    pub password_env: String,
    /// Recipient addresses; email is skipped when empty
    pub recipients: Vec<String>,
    pub subject: String,
    /// Image attached to every email, skipped if the file is missing
    pub attachment: Option<String>,
    /// Closing lines of the body
    pub signature: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://www.accuweather.com".to_string()
}

fn default_user_agent() -> String {
    "Chrome/80.0.3987.132".to_string()
}

fn default_csv_path() -> String {
    "weather.csv".to_string()
}

fn default_relay() -> String {
    "smtp.gmail.com".to_string()
}

fn default_sender_name() -> String {
    "Daily Weather".to_string()
}

fn default_password_env() -> String {
    "ZIPWEATHER_SMTP_PASSWORD".to_string()
}

fn default_subject() -> String {
    "Daily Weather Updates".to_string()
}

fn default_attachment() -> Option<String> {
    Some("weather1.gif".to_string())
}

fn default_signature() -> String {
    "Thank You!".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            script_index: LOCATION_SCRIPT_INDEX,
            timeout_seconds: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            relay: default_relay(),
            sender: String::new(),
            sender_name: default_sender_name(),
            password_env: default_password_env(),
            recipients: Vec::new(),
            subject: default_subject(),
            attachment: default_attachment(),
            signature: default_signature(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl EmailConfig {
    /// Email goes out only when someone is listening
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.recipients.is_empty()
    }
}

impl AppConfig {
    /// Load configuration from `config_path`, or the default file, plus environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // ZIPWEATHER_EMAIL__RECIPIENTS=a@x.com,b@y.com
        builder = builder.add_source(
            Environment::with_prefix("ZIPWEATHER")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("email.recipients")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zipweather").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.site.base_url.is_empty() {
            self.site.base_url = default_base_url();
        }
        if self.site.user_agent.is_empty() {
            self.site.user_agent = default_user_agent();
        }
        if self.output.csv_path.is_empty() {
            self.output.csv_path = default_csv_path();
        }
        if self.email.relay.is_empty() {
            self.email.relay = default_relay();
        }
        if self.email.password_env.is_empty() {
            self.email.password_env = default_password_env();
        }
        if self.email.subject.is_empty() {
            self.email.subject = default_subject();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_site()?;
        self.validate_email()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<()> {
        let base_url = &self.site.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("Site base URL must be a valid HTTP or HTTPS URL");
        }
        if base_url.ends_with('/') {
            bail!("Site base URL must not end with '/'");
        }
        if self.site.timeout_seconds.is_some_and(|t| t == 0 || t > 300) {
            bail!("Site timeout must be between 1 and 300 seconds");
        }
        Ok(())
    }

    fn validate_email(&self) -> Result<()> {
        if !self.email.is_enabled() {
            return Ok(());
        }
        if self.email.sender.is_empty() {
            bail!("Email sender must be set when recipients are configured");
        }
        if let Some(bad) = self.email.recipients.iter().find(|r| !r.contains('@')) {
            bail!("Invalid recipient address '{bad}'");
        }
        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.site.base_url, "https://www.accuweather.com");
        assert_eq!(config.site.user_agent, "Chrome/80.0.3987.132");
        assert_eq!(config.site.script_index, 2);
        assert_eq!(config.output.csv_path, "weather.csv");
        assert_eq!(config.email.subject, "Daily Weather Updates");
        assert!(!config.email.is_enabled());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = AppConfig::default();
        config.site.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.site.base_url = "https://example.com/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recipients_require_sender() {
        let mut config = AppConfig::default();
        config.email.recipients = vec!["someone@example.com".to_string()];
        assert!(config.validate().is_err());

        config.email.sender = "weather@example.com".to_string();
        assert!(config.validate().is_ok());

        config.email.recipients.push("not-an-address".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_strings() {
        let mut config = AppConfig::default();
        config.site.user_agent.clear();
        config.output.csv_path.clear();
        config.apply_defaults();
        assert_eq!(config.site.user_agent, "Chrome/80.0.3987.132");
        assert_eq!(config.output.csv_path, "weather.csv");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[output]
csv_path = "out/forecast.csv"

[email]
sender = "weather@example.com"
recipients = ["a@example.com", "b@example.com"]
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.output.csv_path, "out/forecast.csv");
        assert_eq!(config.email.recipients.len(), 2);
        assert_eq!(config.email.relay, "smtp.gmail.com");
        assert_eq!(config.site.script_index, 2);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AppConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("zipweather"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
