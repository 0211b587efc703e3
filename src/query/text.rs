//! Weighted multi-field text matching

use super::config::SearchFieldWeight;
use super::tree::{BoolQuery, QueryNode};
use crate::models::{MatchMode, TextMatcher};

/// Builds per-field weighted text matches and merges them into a boolean
/// accumulator according to the matcher's mode
#[derive(Debug, Clone)]
pub struct TextMatchApplier {
    fields: Vec<SearchFieldWeight>,
}

impl TextMatchApplier {
    pub fn new(fields: Vec<SearchFieldWeight>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[SearchFieldWeight] {
        &self.fields
    }

    /// One boosted match clause per configured field
    pub fn field_matches(&self, value: &str, prefix: &str) -> Vec<QueryNode> {
        let value = value.trim();
        self.fields
            .iter()
            .map(|f| QueryNode::Match {
                field: format!("{}{}", prefix, f.field),
                query: value.to_string(),
                boost: f.weight,
            })
            .collect()
    }

    /// Merge the matcher into `acc`.
    ///
    /// `MUST` adds a single required disjunction over the fields. `SHOULD`
    /// adds every field match as an optional clause. Blank matchers leave the
    /// accumulator untouched.
    pub fn apply(&self, matcher: &TextMatcher, prefix: &str, mut acc: BoolQuery) -> BoolQuery {
        if matcher.is_blank() {
            return acc;
        }

        let matches = self.field_matches(&matcher.value, prefix);
        match matcher.match_mode {
            MatchMode::Must => {
                if let Some(node) = QueryNode::any_of(matches) {
                    acc.must.push(node);
                }
            }
            MatchMode::Should => acc.should.extend(matches),
        }
        acc
    }
}
