//! Relevance scoring
//!
//! Wraps a compiled query in a function-score query. Rule values are summed
//! and the capped sum multiplies the base text relevance.

mod config;
mod document;
mod rules;
mod scorer;

pub use self::config::{DecayConfig, ExistenceBoost, ScoringConfig, TermBoost};
pub use self::document::ScoringDocument;
pub use self::rules::{functions_from_config, DecayFunction, ScoreFunction, DECAY_ORIGIN_NOW};
pub use self::scorer::{BoostMode, FunctionScoreQuery, RelevanceScorer, ScoreMode};
