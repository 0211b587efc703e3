use crate::error::{AppError, Result};
use crate::query::SearchConfig;
use crate::scheduler::SchedulerConfig;
use crate::scoring::ScoringConfig;
use crate::suggest::SuggestConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Embedded defaults, the base layer of every load
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query compilation: field tables, aliases, limits
    #[serde(default)]
    pub search: SearchConfig,

    /// Relevance rule set
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Suggestion store
    #[serde(default)]
    pub suggest: SuggestConfig,

    /// Maintenance jobs
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the embedded defaults, `$CONFIG_PATH` and the
    /// environment (prefix `MEDIA_SEARCH`, separator `__`)
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MEDIA_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load the embedded defaults overridden by a single file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_str().ok_or_else(|| {
            AppError::Configuration(format!("config path {} is not valid UTF-8", path.display()))
        })?;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::new(path_str, config::FileFormat::Toml).required(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Run every section's validation
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.scoring.validate()?;
        self.suggest.check()?;
        self.observability.validate()?;
        if self.scheduler.job_timeout_secs == 0 {
            return Err(AppError::Configuration(
                "scheduler.job_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,
}

impl ObservabilityConfig {
    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            return Err(AppError::Configuration(
                "observability.log_level must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.suggest.ttl_secs, SuggestConfig::default().ttl_secs);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
