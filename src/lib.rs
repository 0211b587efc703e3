//! Search core for a media catalogue
//!
//! - [`query`]: compiles [`models::SearchCriteria`] into a boolean query tree
//!   or query-language text, and orders facet buckets
//! - [`scoring`]: wraps compiled queries in the relevance rule set
//! - [`suggest`]: grouped, TTL-bounded query suggestions
//! - [`scheduler`]: periodic maintenance such as suggestion cleanup

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod scheduler;
pub mod scoring;
pub mod suggest;

pub use crate::config::{Config, ObservabilityConfig};
pub use crate::error::{AppError, Result};
