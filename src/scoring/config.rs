//! Relevance scoring configuration

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Boost applied when a field is present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistenceBoost {
    pub field: String,
    pub boost: f64,
}

/// Boost applied when a field holds a given value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermBoost {
    pub field: String,
    pub value: String,
    pub boost: f64,
}

/// Gaussian decay on a date field, relative to "now"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Date field the decay is computed on
    pub field: String,

    /// Distance beyond `offset` at which the score equals `decay`
    pub scale_secs: u64,

    /// Distance from now within which the full score applies
    #[serde(default)]
    pub offset_secs: u64,

    /// Score at `offset + scale`, strictly between 0 and 1
    pub decay: f64,
}

/// Scoring rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Boost for documents with a playable location
    #[serde(default = "default_existence")]
    pub existence: ExistenceBoost,

    /// Independent categorical boosts
    #[serde(default = "default_term_boosts")]
    pub term_boosts: Vec<TermBoost>,

    /// Time decay rule
    #[serde(default = "default_decay")]
    pub decay: DecayConfig,

    /// Upper bound of the combined multiplier
    #[serde(default = "default_max_boost")]
    pub max_boost: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            existence: default_existence(),
            term_boosts: default_term_boosts(),
            decay: default_decay(),
            max_boost: default_max_boost(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        check_boost(&self.existence.field, self.existence.boost)?;
        for term in &self.term_boosts {
            check_boost(&term.field, term.boost)?;
            if term.value.trim().is_empty() {
                return Err(AppError::invalid_argument(format!(
                    "term boost on '{}' has a blank value",
                    term.field
                )));
            }
        }
        if self.decay.field.trim().is_empty() {
            return Err(AppError::invalid_argument("decay field must not be blank"));
        }
        if self.decay.scale_secs == 0 {
            return Err(AppError::invalid_argument("decay scale must be positive"));
        }
        if !(self.decay.decay > 0.0 && self.decay.decay < 1.0) {
            return Err(AppError::invalid_argument(format!(
                "decay must be strictly between 0 and 1, got {}",
                self.decay.decay
            )));
        }
        if !self.max_boost.is_finite() || self.max_boost <= 0.0 {
            return Err(AppError::invalid_argument(format!(
                "max_boost must be positive, got {}",
                self.max_boost
            )));
        }
        Ok(())
    }
}

fn check_boost(field: &str, boost: f64) -> Result<()> {
    if field.trim().is_empty() {
        return Err(AppError::invalid_argument("boost field must not be blank"));
    }
    if !boost.is_finite() || boost < 0.0 {
        return Err(AppError::invalid_argument(format!(
            "boost on '{}' must be a non-negative number, got {}",
            field, boost
        )));
    }
    Ok(())
}

fn default_existence() -> ExistenceBoost {
    ExistenceBoost {
        field: "locations.programUrl".to_string(),
        boost: 1.5,
    }
}

fn default_term_boosts() -> Vec<TermBoost> {
    vec![
        TermBoost {
            field: "type".to_string(),
            value: "BROADCAST".to_string(),
            boost: 1.25,
        },
        TermBoost {
            field: "avType".to_string(),
            value: "VIDEO".to_string(),
            boost: 1.1,
        },
    ]
}

fn default_decay() -> DecayConfig {
    DecayConfig {
        field: "sortDate".to_string(),
        scale_secs: 30 * 24 * 3600,
        offset_secs: 7 * 24 * 3600,
        decay: 0.5,
    }
}

fn default_max_boost() -> f64 {
    4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
        assert_eq!(ScoringConfig::default().term_boosts.len(), 2);
    }

    #[test]
    fn test_decay_bounds() {
        let mut config = ScoringConfig::default();
        config.decay.decay = 1.0;
        assert!(config.validate().is_err());
        config.decay.decay = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_boost_rejected() {
        let mut config = ScoringConfig::default();
        config.existence.boost = -1.0;
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_max_boost_rejected() {
        let config = ScoringConfig {
            max_boost: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
