use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Upper bound on a single relay request, measured from connection start.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Fixed endpoint the holiday relay reads from.
pub const DEFAULT_HOLIDAY_URL: &str = "https://www.timeanddate.com/holidays/us/?hol=43122559";

const DEFAULT_USER_AGENT: &str = concat!("dynweather/", env!("CARGO_PKG_VERSION"));

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "DYNWEATHER_CONFIG";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Join all errors into one line, e.g. for a startup failure message
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Outbound request settings
    #[serde(default)]
    pub relay: RelayConfig,

    /// Log filter settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Timeout for a whole request (connect + body), in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Endpoint queried on `Holiday-Fetch`
    #[serde(default = "default_holiday_url")]
    pub holiday_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_holiday_url() -> String {
    DEFAULT_HOLIDAY_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            holiday_url: default_holiday_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl RelayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// A loaded config plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// True when the file was missing and defaults were written to `path`.
    pub created: bool,
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<LoadedConfig> {
        let config_path = Self::config_path()?;
        Self::load_or_create(&config_path)
    }

    /// Load configuration from `path`, writing defaults there first if the file is missing.
    ///
    /// Nothing is logged here since this normally runs before logging is set up;
    /// callers report `LoadedConfig::created` themselves.
    pub fn load_or_create(path: &Path) -> Result<LoadedConfig> {
        let created = !path.exists();
        let config = if created {
            let config = Self::default();
            config.save_to(path)?;
            config
        } else {
            Self::load_from(path)?
        };

        Ok(LoadedConfig {
            config,
            path: path.to_path_buf(),
            created,
        })
    }

    /// Load configuration from an existing file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate and log warnings, failing if there are any errors
    pub fn ensure_valid(&self) -> std::result::Result<ValidationResult, ConfigError> {
        let validation = self.validate();

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        Ok(validation)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.relay.request_timeout_ms == 0 {
            result.add_error(
                "relay.request_timeout_ms",
                "Request timeout must be greater than 0",
            );
        } else if self.relay.request_timeout_ms > 120_000 {
            result.add_warning(
                "relay.request_timeout_ms",
                "Request timeout is longer than two minutes",
            );
        }

        self.validate_url(&self.relay.holiday_url, "relay.holiday_url", &mut result);

        if self.relay.user_agent.trim().is_empty() {
            result.add_warning(
                "relay.user_agent",
                "Empty User-Agent; some endpoints reject anonymous clients",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Resolve the config file path: `$DYNWEATHER_CONFIG`, else `<config_dir>/dynweather/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("platform config directory".to_string()))?
            .join("dynweather");

        Ok(config_dir.join("config.toml"))
    }
}
