//! Field view of an indexed document, used to evaluate score functions

use crate::query::{BoolQuery, QueryNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fields of a stored document that scoring rules look at
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringDocument {
    /// Document id
    pub id: String,

    /// Keyword and text field values
    #[serde(default)]
    pub fields: HashMap<String, Vec<String>>,

    /// Date field values
    #[serde(default)]
    pub dates: HashMap<String, DateTime<Utc>>,
}

impl ScoringDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.entry(field.into()).or_default().push(value.into());
        self
    }

    pub fn with_date(mut self, field: impl Into<String>, date: DateTime<Utc>) -> Self {
        self.dates.insert(field.into(), date);
        self
    }

    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn date(&self, field: &str) -> Option<DateTime<Utc>> {
        self.dates.get(field).copied()
    }

    /// Whether the document satisfies `query`.
    ///
    /// Text matches are approximated by case-insensitive token overlap.
    pub fn matches(&self, query: &QueryNode) -> bool {
        match query {
            QueryNode::MatchAll {} => true,
            QueryNode::Term { field, value } => self.values(field).iter().any(|v| v == value),
            QueryNode::Prefix { field, value } => {
                self.values(field).iter().any(|v| v.starts_with(value.as_str()))
            }
            QueryNode::Exists { field } => {
                self.values(field).iter().any(|v| !v.is_empty()) || self.dates.contains_key(field)
            }
            QueryNode::Match { field, query, .. } => {
                let wanted: Vec<String> = tokens(query).collect();
                self.values(field)
                    .iter()
                    .flat_map(|v| tokens(v))
                    .any(|token| wanted.contains(&token))
            }
            QueryNode::Bool(bool_query) => self.matches_bool(bool_query),
        }
    }

    fn matches_bool(&self, query: &BoolQuery) -> bool {
        if !query.must.iter().all(|q| self.matches(q)) {
            return false;
        }
        if !query.filter.iter().all(|q| self.matches(q)) {
            return false;
        }
        let matched_should = query.should.iter().filter(|q| self.matches(q)).count();
        matched_should as u32 >= query.effective_minimum_should_match()
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
