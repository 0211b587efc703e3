//! Field constraints and their rendering as fragments or query nodes

use super::fragment::{escape_term, quote_value, BooleanOperator, QueryFragment};
use super::grouping::BooleanGroupingBuilder;
use super::tree::QueryNode;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single `{field, value}` constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldFilter {
    /// Field equals value
    Exact { field: String, value: String },
    /// Field starts with value
    Prefix { field: String, value: String },
    /// Field has any value
    Exists { field: String },
}

impl FieldFilter {
    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        FieldFilter::Exact {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        FieldFilter::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        FieldFilter::Exists {
            field: field.into(),
        }
    }

    /// The (unresolved) field this filter constrains
    pub fn field(&self) -> &str {
        match self {
            FieldFilter::Exact { field, .. }
            | FieldFilter::Prefix { field, .. }
            | FieldFilter::Exists { field } => field,
        }
    }

    /// Reject blank fields and blank values
    pub fn validate(&self) -> Result<()> {
        if self.field().trim().is_empty() {
            return Err(AppError::invalid_argument("field filter without field name"));
        }
        match self {
            FieldFilter::Exact { field, value } | FieldFilter::Prefix { field, value }
                if value.trim().is_empty() =>
            {
                Err(AppError::invalid_argument(format!(
                    "field filter on '{}' has a blank value",
                    field
                )))
            }
            _ => Ok(()),
        }
    }

    /// Query node for this filter against an already resolved field name
    pub fn to_node(&self, field_name: impl Into<String>) -> QueryNode {
        match self {
            FieldFilter::Exact { value, .. } => QueryNode::term(field_name, value.clone()),
            FieldFilter::Prefix { value, .. } => QueryNode::prefix(field_name, value.clone()),
            FieldFilter::Exists { .. } => QueryNode::exists(field_name),
        }
    }

    /// Query-language text for this filter against a resolved field name
    pub fn to_fragment_text(&self, field_name: &str) -> String {
        match self {
            FieldFilter::Exact { value, .. } => format!("{}:{}", field_name, quote_value(value)),
            FieldFilter::Prefix { value, .. } => {
                format!("{}:{}*", field_name, escape_term(value))
            }
            FieldFilter::Exists { .. } => format!("_exists_:{}", field_name),
        }
    }
}

/// Resolves logical field names and turns constraints into fragments or nodes
#[derive(Debug, Clone, Default)]
pub struct FieldFilterBuilder {
    aliases: HashMap<String, String>,
}

impl FieldFilterBuilder {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Index field for a logical field name, nested under `prefix`
    pub fn resolve_field(&self, field: &str, prefix: &str) -> String {
        let field = self
            .aliases
            .get(field)
            .map(String::as_str)
            .unwrap_or(field);
        format!("{}{}", prefix, field)
    }

    /// Join the given filters into one fragment with `operator`, grouped when
    /// there is more than one. Returns `None` when there are no filters.
    pub fn fragment(
        &self,
        filters: &[FieldFilter],
        operator: BooleanOperator,
        prefix: &str,
    ) -> Result<Option<QueryFragment>> {
        if filters.is_empty() {
            return Ok(None);
        }

        let mut builder = BooleanGroupingBuilder::new(operator, filters.len());
        for filter in filters {
            filter.validate()?;
            let field = self.resolve_field(filter.field(), prefix);
            builder.append(filter.to_fragment_text(&field));
        }
        Ok(Some(builder.close().build()))
    }

    /// One query node per filter
    pub fn nodes(&self, filters: &[FieldFilter], prefix: &str) -> Result<Vec<QueryNode>> {
        filters
            .iter()
            .map(|filter| {
                filter.validate()?;
                Ok(filter.to_node(self.resolve_field(filter.field(), prefix)))
            })
            .collect()
    }
}
