//! Score functions of the function-score wrapper

use super::config::{DecayConfig, ScoringConfig};
use super::document::ScoringDocument;
use crate::query::QueryNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of every decay function; resolved by the backend at query time
pub const DECAY_ORIGIN_NOW: &str = "now";

/// Gaussian decay around "now"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayFunction {
    pub field: String,
    pub origin: String,
    pub scale_secs: u64,
    pub offset_secs: u64,
    pub decay: f64,
}

impl DecayFunction {
    pub fn from_config(config: &DecayConfig) -> Self {
        Self {
            field: config.field.clone(),
            origin: DECAY_ORIGIN_NOW.to_string(),
            scale_secs: config.scale_secs,
            offset_secs: config.offset_secs,
            decay: config.decay,
        }
    }

    /// Decay value for a date. Full strength within `offset` of `now`.
    pub fn value_at(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let distance = (now - date).num_milliseconds().unsigned_abs() as f64 / 1000.0;
        let beyond = (distance - self.offset_secs as f64).max(0.0);
        let scale = self.scale_secs as f64;
        let variance = -(scale * scale) / (2.0 * self.decay.ln());
        (-(beyond * beyond) / (2.0 * variance)).exp()
    }
}

/// One function of a function-score query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFunction {
    /// Constant weight applied to documents matching `filter`
    Weight { filter: QueryNode, weight: f64 },

    /// Gaussian time decay
    Gauss(DecayFunction),
}

impl ScoreFunction {
    pub fn weight(filter: QueryNode, weight: f64) -> Self {
        ScoreFunction::Weight { filter, weight }
    }

    /// Contribution of this function to a document's multiplier, `None` when
    /// the function does not apply
    pub fn evaluate(&self, document: &ScoringDocument, now: DateTime<Utc>) -> Option<f64> {
        match self {
            ScoreFunction::Weight { filter, weight } => {
                document.matches(filter).then_some(*weight)
            }
            ScoreFunction::Gauss(decay) => Some(
                document
                    .date(&decay.field)
                    .map_or(1.0, |date| decay.value_at(date, now)),
            ),
        }
    }
}

/// Functions for a rule set, in a fixed order: existence, term boosts, decay
pub fn functions_from_config(config: &ScoringConfig) -> Vec<ScoreFunction> {
    let mut functions = Vec::with_capacity(config.term_boosts.len() + 2);
    functions.push(ScoreFunction::weight(
        QueryNode::exists(config.existence.field.clone()),
        config.existence.boost,
    ));
    functions.extend(config.term_boosts.iter().map(|term| {
        ScoreFunction::weight(
            QueryNode::term(term.field.clone(), term.value.clone()),
            term.boost,
        )
    }));
    functions.push(ScoreFunction::Gauss(DecayFunction::from_config(&config.decay)));
    functions
}
