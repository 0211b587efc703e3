//! Search criteria compilation
//!
//! Turns parsed [`SearchCriteria`](crate::models::SearchCriteria) into a
//! boolean query tree for the full-text index:
//!
//! ```text
//! SearchCriteria ──► QueryCompiler ──► QueryNode (bool / term / match ...)
//!                      │      │
//!                      │      └── FieldFilterBuilder  (exact / prefix / exists)
//!                      └───────── TextMatchApplier    (weighted multi-field text)
//! ```
//!
//! The same criteria can also be rendered as query-language text through
//! [`QueryCompiler::compile_fragment`], built on
//! [`BooleanGroupingBuilder`].
//!
//! # Example
//!
//! ```
//! use media_search_core::models::{SearchContext, SearchCriteria, SearchDomain, TextMatcher};
//! use media_search_core::query::{BoolQuery, QueryCompiler, SearchConfig};
//!
//! let compiler = QueryCompiler::new(SearchDomain::Media, &SearchConfig::default());
//! let criteria = SearchCriteria::new()
//!     .with_text(TextMatcher::must("lubach"))
//!     .with_types(vec!["BROADCAST", "CLIP"]);
//!
//! let query = compiler
//!     .compile(Some(&criteria), &SearchContext::new(), BoolQuery::new(), Some(""))
//!     .unwrap();
//! assert!(!query.is_match_all());
//! ```

mod compiler;
mod config;
mod facet;
mod filter;
mod fragment;
mod grouping;
mod text;
mod tree;

pub use self::compiler::{QueryCompiler, MATCH_ALL_FRAGMENT};
pub use self::config::{DomainFieldsConfig, SearchConfig, SearchConfigBuilder, SearchFieldWeight};
pub use self::facet::{BucketKey, BucketOrder, FacetBucket, FacetSortDirective, SortOrder};
pub use self::filter::{FieldFilter, FieldFilterBuilder};
pub use self::fragment::{escape_term, quote_value, BooleanOperator, QueryFragment};
pub use self::grouping::{BooleanGroupingBuilder, ClosedGroup};
pub use self::text::TextMatchApplier;
pub use self::tree::{BoolQuery, QueryNode};
