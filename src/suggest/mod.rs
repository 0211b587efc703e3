//! Query suggestions
//!
//! Stores previously observed query strings per group (tenant, broadcaster)
//! and answers prefix lookups over them. Entries expire after a configured
//! TTL; [`SuggestionStore::cleanup`] removes them physically and is meant to
//! be run periodically by the scheduler.
//!
//! # Example
//!
//! ```
//! use media_search_core::suggest::{SuggestConfig, SuggestionStore};
//!
//! let store = SuggestionStore::new(SuggestConfig::default()).unwrap();
//! store.index("lubach", "vpro").unwrap();
//! store.index("luitjes", "eo").unwrap();
//!
//! let hits = store.suggest("lu", "vpro", None);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].text, "lubach");
//! ```

mod clock;
mod config;
mod metrics;
mod similarity;
mod store;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::config::{Similarity, SuggestConfig, SuggestConfigBuilder, MAX_TTL_SECS};
pub use self::metrics::{init_suggest_metrics, SuggestMetrics, SUGGEST_METRICS};
pub use self::similarity::PrefixMatcher;
pub use self::store::{SuggestStats, Suggestion, SuggestionStore};
