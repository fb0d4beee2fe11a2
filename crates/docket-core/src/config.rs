use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::constants::{DEFAULT_MAX_ITERATIONS, ENV_PREFIX};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub recurrence: RecurrenceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// Candidate occurrences considered before an expansion reports overflow.
    pub max_iterations: usize,
    /// Whether the base event's own occurrence is part of expansion output.
    pub include_base_occurrence: bool,
    /// IANA zone in which occurrences are stepped (wall-clock arithmetic).
    pub timezone: String,
    /// First day of the week group for weekly rules with weekdays.
    pub week_start: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Returns a configuration builder pre-populated with defaults.
    ///
    /// ## Errors
    /// Returns an error if a default value cannot be set.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default(
                "recurrence.max_iterations",
                u64::try_from(DEFAULT_MAX_ITERATIONS)?,
            )?
            .set_default("recurrence.include_base_occurrence", true)?
            .set_default("recurrence.timezone", "UTC")?
            .set_default("recurrence.week_start", "sunday")?
            .set_default("logging.level", "info")?)
    }

    /// ## Summary
    /// Loads configuration from `config.toml` and environment variables into a `Settings`.
    /// Environment variables (`DOCKET__RECURRENCE__TIMEZONE`, ...) take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        tracing::debug!(settings = ?settings, "Settings loaded");

        Ok(settings)
    }

    /// ## Summary
    /// Builds settings from an inline TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is not valid TOML or does not deserialize.
    pub fn from_toml(document: &str) -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
