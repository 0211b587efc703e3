//! Function-score wrapping of compiled queries

use super::config::ScoringConfig;
use super::document::ScoringDocument;
use super::rules::{functions_from_config, ScoreFunction};
use crate::error::Result;
use crate::query::QueryNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How function values combine among themselves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    Sum,
}

/// How the combined function value combines with the query score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoostMode {
    Multiply,
}

/// A base query with score functions applied on top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionScoreQuery {
    pub query: QueryNode,
    pub functions: Vec<ScoreFunction>,
    pub score_mode: ScoreMode,
    pub boost_mode: BoostMode,
    pub max_boost: f64,
}

impl FunctionScoreQuery {
    /// Combined multiplier for a document.
    ///
    /// Function values are summed; with no applicable function the
    /// multiplier is 1.0. The result never exceeds `max_boost`.
    pub fn multiplier(&self, document: &ScoringDocument, now: DateTime<Utc>) -> f64 {
        let applied: Vec<f64> = self
            .functions
            .iter()
            .filter_map(|function| function.evaluate(document, now))
            .collect();

        let combined = match self.score_mode {
            ScoreMode::Sum if applied.is_empty() => 1.0,
            ScoreMode::Sum => applied.iter().sum(),
        };
        combined.min(self.max_boost)
    }

    /// Final score of a document whose base text relevance is `base_score`
    pub fn score(&self, base_score: f64, document: &ScoringDocument, now: DateTime<Utc>) -> f64 {
        let multiplier = self.multiplier(document, now);
        match self.boost_mode {
            BoostMode::Multiply => base_score * multiplier,
        }
    }
}

/// Wraps compiled queries in the configured rule set
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    functions: Vec<ScoreFunction>,
    max_boost: f64,
}

impl RelevanceScorer {
    pub fn new(config: &ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            functions: functions_from_config(config),
            max_boost: config.max_boost,
        })
    }

    pub fn max_boost(&self) -> f64 {
        self.max_boost
    }

    pub fn wrap(&self, query: QueryNode) -> FunctionScoreQuery {
        debug!(
            functions = self.functions.len(),
            max_boost = self.max_boost,
            "wrapping query in function score"
        );
        FunctionScoreQuery {
            query,
            functions: self.functions.clone(),
            score_mode: ScoreMode::Sum,
            boost_mode: BoostMode::Multiply,
            max_boost: self.max_boost,
        }
    }
}
