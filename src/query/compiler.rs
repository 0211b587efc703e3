//! Compiles search criteria into one boolean query per search domain

use super::config::{DomainFieldsConfig, SearchConfig};
use super::filter::{FieldFilter, FieldFilterBuilder};
use super::fragment::{quote_value, BooleanOperator, QueryFragment};
use super::grouping::BooleanGroupingBuilder;
use super::text::TextMatchApplier;
use super::tree::{BoolQuery, QueryNode};
use crate::error::{AppError, Result};
use crate::models::{MatchMode, SearchContext, SearchCriteria, SearchDomain};
use tracing::debug;

/// Query-string form of "match every document"
pub const MATCH_ALL_FRAGMENT: &str = "*:*";

/// Compiles [`SearchCriteria`] for one [`SearchDomain`].
///
/// Stateless after construction; safe to share between threads.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    domain: SearchDomain,
    fields: DomainFieldsConfig,
    text: TextMatchApplier,
    filters: FieldFilterBuilder,
    max_constraints: usize,
}

impl QueryCompiler {
    pub fn new(domain: SearchDomain, config: &SearchConfig) -> Self {
        let fields = config.domain(domain).clone();
        Self {
            domain,
            text: TextMatchApplier::new(fields.text_fields.clone()),
            filters: FieldFilterBuilder::new(config.field_aliases.clone()),
            fields,
            max_constraints: config.max_constraints,
        }
    }

    pub fn domain(&self) -> SearchDomain {
        self.domain
    }

    /// Compile `criteria` into `accumulator`.
    ///
    /// `prefix` nests every field under a parent path (`""` is the document
    /// root); `None` is rejected with [`AppError::InvalidArgument`]. Missing
    /// or empty criteria add nothing. If the resulting container holds no
    /// clause at all, match-all is returned instead.
    pub fn compile(
        &self,
        criteria: Option<&SearchCriteria>,
        context: &SearchContext,
        accumulator: BoolQuery,
        prefix: Option<&str>,
    ) -> Result<QueryNode> {
        let prefix = normalize_prefix(prefix)?;
        let mut acc = accumulator;
        let should_before = acc.should.len();

        match criteria {
            Some(criteria) if !criteria.is_empty() => {
                criteria.check(self.max_constraints)?;
                acc = self.apply_criteria(criteria, &prefix, acc)?;
            }
            _ => debug!(domain = %self.domain, "no criteria given, nothing to add"),
        }

        acc.filter.extend(self.filters.nodes(context.filters(), &prefix)?);

        // Optional text clauses alone must still restrict the result set
        let added_should_text = acc.should.len() > should_before;
        if added_should_text && !acc.has_required_clauses() && acc.minimum_should_match.is_none() {
            acc.minimum_should_match = Some(1);
        }

        let clauses = acc.clause_count();
        let node = acc.into_node();
        debug!(
            domain = %self.domain,
            clauses,
            match_all = node.is_match_all(),
            "compiled search criteria"
        );
        Ok(node)
    }

    fn apply_criteria(
        &self,
        criteria: &SearchCriteria,
        prefix: &str,
        mut acc: BoolQuery,
    ) -> Result<BoolQuery> {
        if let Some(matcher) = criteria.text_matcher() {
            acc = self.text.apply(matcher, prefix, acc);
        }

        for (field, values) in self.categories(criteria) {
            let field = format!("{}{}", prefix, field);
            let terms = values
                .iter()
                .map(|value| QueryNode::term(field.clone(), value.clone()))
                .collect();
            if let Some(node) = QueryNode::any_of(terms) {
                acc.filter.push(node);
            }
        }

        acc.filter.extend(self.filters.nodes(&criteria.filters, prefix)?);
        Ok(acc)
    }

    /// Render `criteria` as query-language text.
    ///
    /// Each list category becomes an `OR` group. Categories, field filters
    /// and the filters of `context` are joined with `AND`, and the free-text
    /// value trails the closed group. `MUST` text is rendered as a required
    /// term (`+lubach`, `+(zondag met lubach)`), `SHOULD` text as is.
    pub fn compile_fragment(
        &self,
        criteria: Option<&SearchCriteria>,
        context: &SearchContext,
        prefix: Option<&str>,
    ) -> Result<QueryFragment> {
        let prefix = normalize_prefix(prefix)?;
        let criteria = criteria.filter(|criteria| !criteria.is_empty());

        let mut parts = Vec::new();
        if let Some(criteria) = criteria {
            criteria.check(self.max_constraints)?;
            for (field, values) in self.categories(criteria) {
                let field = format!("{}{}", prefix, field);
                let mut group = BooleanGroupingBuilder::new(BooleanOperator::Or, values.len());
                for value in values {
                    group.append(format!("{}:{}", field, quote_value(value)));
                }
                parts.push(group.close().build());
            }
        }

        let filters = criteria
            .map(|criteria| criteria.filters.as_slice())
            .unwrap_or_default()
            .iter()
            .chain(context.filters());
        for filter in filters {
            if let Some(fragment) = self.filters.fragment(
                std::slice::from_ref(filter),
                BooleanOperator::And,
                &prefix,
            )? {
                parts.push(fragment);
            }
        }

        let mut outer = BooleanGroupingBuilder::new(BooleanOperator::And, parts.len());
        for part in &parts {
            outer.append(part);
        }
        let mut closed = outer.close();
        if let Some(matcher) = criteria.and_then(|criteria| criteria.text_matcher()) {
            closed = match matcher.match_mode {
                MatchMode::Must => closed.free_text(required_text(&matcher.value)),
                MatchMode::Should => closed.free_text(&matcher.value),
            };
        }

        let fragment = closed.build();
        if fragment.is_empty() {
            return Ok(QueryFragment::new(MATCH_ALL_FRAGMENT, BooleanOperator::And));
        }
        debug!(
            domain = %self.domain,
            parts = parts.len(),
            context_filters = context.filters().len(),
            "rendered search criteria"
        );
        Ok(fragment)
    }

    /// Non-empty list constraints with the field they apply to
    fn categories<'a>(&'a self, criteria: &'a SearchCriteria) -> Vec<(&'a str, &'a [String])> {
        [
            (self.fields.id_field.as_str(), criteria.ids.as_slice()),
            (self.fields.type_field.as_str(), criteria.types.as_slice()),
            (self.fields.language_field.as_str(), criteria.languages.as_slice()),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .collect()
    }

    /// Field-filter fragment for ad-hoc constraints, e.g. facet drill-downs
    pub fn filter_fragment(
        &self,
        filters: &[FieldFilter],
        operator: BooleanOperator,
        prefix: Option<&str>,
    ) -> Result<Option<QueryFragment>> {
        let prefix = normalize_prefix(prefix)?;
        self.filters.fragment(filters, operator, &prefix)
    }
}

/// Mark free text as required. Several words are grouped so the whole
/// phrase is required rather than its first word.
fn required_text(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else if value.chars().any(char::is_whitespace) {
        format!("+({})", value)
    } else {
        format!("+{}", value)
    }
}

/// Validate a field prefix. Non-empty prefixes get a trailing `.`.
fn normalize_prefix(prefix: Option<&str>) -> Result<String> {
    let prefix = prefix.ok_or_else(|| {
        AppError::invalid_argument("field prefix is required; use \"\" for the document root")
    })?;

    if prefix.chars().any(char::is_whitespace) {
        return Err(AppError::invalid_argument(format!(
            "field prefix '{}' contains whitespace",
            prefix
        )));
    }

    if prefix.is_empty() || prefix.ends_with('.') {
        Ok(prefix.to_string())
    } else {
        Ok(format!("{}.", prefix))
    }
}
