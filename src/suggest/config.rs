//! Suggestion store configuration

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumString};
use validator::Validate;

/// Longest accepted suggestion TTL, ten years
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

/// Similarity model used to score prefix matches
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Similarity {
    /// Every match scores 1.0
    #[default]
    Uniform,
    /// `1 / (1 + edits)`
    EditDistance,
}

/// Suggestion store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SuggestConfig {
    /// Entry lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    #[validate(range(min = 1, max = 315360000, message = "suggestion TTL out of range"))]
    pub ttl_secs: i64,

    /// Result size when the caller gives none
    #[serde(default = "default_size")]
    #[validate(range(min = 1))]
    pub default_size: usize,

    /// Upper bound on the result size
    #[serde(default = "default_max_size")]
    #[validate(range(min = 1))]
    pub max_size: usize,

    /// Maximum edits for a fuzzy prefix match
    #[serde(default = "default_max_edits")]
    #[validate(range(max = 2))]
    pub max_edits: usize,

    /// Prefixes shorter than this only match exactly
    #[serde(default = "default_fuzzy_min_length")]
    pub fuzzy_min_length: usize,

    #[serde(default)]
    pub similarity: Similarity,

    /// Cleanup interval in seconds, at most half the TTL; defaults to half the TTL
    #[serde(default)]
    pub cleanup_interval_secs: Option<u64>,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            default_size: default_size(),
            max_size: default_max_size(),
            max_edits: default_max_edits(),
            fuzzy_min_length: default_fuzzy_min_length(),
            similarity: Similarity::default(),
            cleanup_interval_secs: None,
        }
    }
}

impl SuggestConfig {
    pub fn builder() -> SuggestConfigBuilder {
        SuggestConfigBuilder::default()
    }

    pub fn check(&self) -> Result<()> {
        if self.ttl_secs <= 0 {
            return Err(AppError::invalid_argument(format!(
                "suggestion TTL must be positive, got {}s",
                self.ttl_secs
            )));
        }
        if self.ttl_secs > MAX_TTL_SECS {
            return Err(AppError::invalid_argument(format!(
                "suggestion TTL must be at most {}s, got {}s",
                MAX_TTL_SECS, self.ttl_secs
            )));
        }
        Validate::validate(self)?;
        if self.default_size > self.max_size {
            return Err(AppError::invalid_argument(format!(
                "default_size {} exceeds max_size {}",
                self.default_size, self.max_size
            )));
        }
        if let Some(interval) = self.cleanup_interval_secs {
            if interval == 0 || interval > self.max_cleanup_interval_secs() {
                return Err(AppError::invalid_argument(format!(
                    "cleanup interval must be between 1s and half the TTL ({}s), got {}s",
                    self.max_cleanup_interval_secs(),
                    interval
                )));
            }
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.max(0) as u64)
    }

    fn max_cleanup_interval_secs(&self) -> u64 {
        (self.ttl_secs.max(0) as u64 / 2).max(1)
    }

    /// Effective cleanup interval
    pub fn cleanup_interval(&self) -> Duration {
        let secs = self
            .cleanup_interval_secs
            .unwrap_or_else(|| self.max_cleanup_interval_secs());
        Duration::from_secs(secs)
    }

    /// Clamp a requested result size
    pub fn effective_size(&self, size: Option<usize>) -> usize {
        size.unwrap_or(self.default_size).min(self.max_size)
    }
}

/// Builder for [`SuggestConfig`]
#[derive(Debug, Default)]
pub struct SuggestConfigBuilder {
    config: SuggestConfig,
}

impl SuggestConfigBuilder {
    pub fn ttl_secs(mut self, secs: i64) -> Self {
        self.config.ttl_secs = secs;
        self
    }

    pub fn default_size(mut self, size: usize) -> Self {
        self.config.default_size = size;
        self
    }

    pub fn max_size(mut self, size: usize) -> Self {
        self.config.max_size = size;
        self
    }

    pub fn max_edits(mut self, edits: usize) -> Self {
        self.config.max_edits = edits;
        self
    }

    pub fn fuzzy_min_length(mut self, length: usize) -> Self {
        self.config.fuzzy_min_length = length;
        self
    }

    pub fn similarity(mut self, similarity: Similarity) -> Self {
        self.config.similarity = similarity;
        self
    }

    pub fn cleanup_interval_secs(mut self, secs: u64) -> Self {
        self.config.cleanup_interval_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<SuggestConfig> {
        self.config.check()?;
        Ok(self.config)
    }
}

fn default_ttl_secs() -> i64 {
    14 * 24 * 3600
}

fn default_size() -> usize {
    10
}

fn default_max_size() -> usize {
    100
}

fn default_max_edits() -> usize {
    2
}

fn default_fuzzy_min_length() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SuggestConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.cleanup_interval(), Duration::from_secs(7 * 24 * 3600));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        for ttl in [0, -5] {
            let err = SuggestConfig::builder().ttl_secs(ttl).build().unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_cleanup_interval_bounded_by_half_ttl() {
        assert!(SuggestConfig::builder()
            .ttl_secs(60)
            .cleanup_interval_secs(31)
            .build()
            .is_err());
        let config = SuggestConfig::builder()
            .ttl_secs(60)
            .cleanup_interval_secs(30)
            .build()
            .unwrap();
        assert_eq!(config.cleanup_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_effective_size() {
        let config = SuggestConfig::builder().default_size(5).max_size(20).build().unwrap();
        assert_eq!(config.effective_size(None), 5);
        assert_eq!(config.effective_size(Some(7)), 7);
        assert_eq!(config.effective_size(Some(500)), 20);
    }

    #[test]
    fn test_similarity_names() {
        assert_eq!("edit_distance".parse::<Similarity>().unwrap(), Similarity::EditDistance);
        assert_eq!(Similarity::Uniform.to_string(), "uniform");
    }
}
