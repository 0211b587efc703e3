//! Boolean query tree handed to the full-text backend

use serde::{Deserialize, Serialize};

/// A node of the backend query tree.
///
/// Serializes to the usual JSON query DSL shape, e.g.
/// `{"bool": {"filter": [{"term": {"field": "type", "value": "CLIP"}}]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryNode {
    /// Matches every document
    MatchAll {},

    /// Boolean combination of clauses
    Bool(BoolQuery),

    /// Exact term match on a keyword field
    Term { field: String, value: String },

    /// Prefix match on a keyword field
    Prefix { field: String, value: String },

    /// Field has at least one value
    Exists { field: String },

    /// Analyzed full-text match with a per-field boost
    Match {
        field: String,
        query: String,
        boost: f64,
    },
}

impl QueryNode {
    pub fn match_all() -> Self {
        QueryNode::MatchAll {}
    }

    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryNode::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryNode::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        QueryNode::Exists {
            field: field.into(),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, QueryNode::MatchAll {})
    }

    /// Disjunction of the given nodes. A single node is returned as is.
    pub fn any_of(mut nodes: Vec<QueryNode>) -> Option<QueryNode> {
        match nodes.len() {
            0 => None,
            1 => nodes.pop(),
            _ => Some(QueryNode::Bool(BoolQuery {
                should: nodes,
                minimum_should_match: Some(1),
                ..Default::default()
            })),
        }
    }
}

/// Boolean query accumulator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    /// Required, scoring clauses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<QueryNode>,

    /// Optional, scoring clauses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<QueryNode>,

    /// Required, non-scoring clauses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<QueryNode>,

    /// Minimum number of `should` clauses a document has to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, node: QueryNode) -> Self {
        self.must.push(node);
        self
    }

    pub fn should(mut self, node: QueryNode) -> Self {
        self.should.push(node);
        self
    }

    pub fn filter(mut self, node: QueryNode) -> Self {
        self.filter.push(node);
        self
    }

    /// Total number of clauses across all occurrences
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.filter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clause_count() == 0
    }

    /// Whether any clause is mandatory
    pub fn has_required_clauses(&self) -> bool {
        !self.must.is_empty() || !self.filter.is_empty()
    }

    /// Number of `should` clauses that have to match for a document to match
    pub fn effective_minimum_should_match(&self) -> u32 {
        match self.minimum_should_match {
            Some(n) => n,
            None if !self.has_required_clauses() && !self.should.is_empty() => 1,
            None => 0,
        }
    }

    /// Convert into a node, substituting match-all for an empty container and
    /// collapsing a lone `must` clause
    pub fn into_node(mut self) -> QueryNode {
        if self.is_empty() {
            return QueryNode::match_all();
        }
        if self.must.len() == 1 && self.should.is_empty() && self.filter.is_empty() {
            if let Some(node) = self.must.pop() {
                return node;
            }
        }
        QueryNode::Bool(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bool_is_match_all() {
        assert!(BoolQuery::new().into_node().is_match_all());
    }

    #[test]
    fn test_single_must_collapses() {
        let node = BoolQuery::new().must(QueryNode::term("type", "CLIP")).into_node();
        assert_eq!(node, QueryNode::term("type", "CLIP"));
    }

    #[test]
    fn test_single_filter_does_not_collapse() {
        let node = BoolQuery::new().filter(QueryNode::term("type", "CLIP")).into_node();
        assert!(matches!(node, QueryNode::Bool(_)));
    }

    #[test]
    fn test_any_of() {
        assert_eq!(QueryNode::any_of(vec![]), None);
        assert_eq!(
            QueryNode::any_of(vec![QueryNode::term("a", "1")]),
            Some(QueryNode::term("a", "1"))
        );
        let node = QueryNode::any_of(vec![QueryNode::term("a", "1"), QueryNode::term("a", "2")])
            .unwrap();
        match node {
            QueryNode::Bool(b) => {
                assert_eq!(b.should.len(), 2);
                assert_eq!(b.minimum_should_match, Some(1));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let node = BoolQuery::new()
            .filter(QueryNode::exists("locations"))
            .into_node();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"bool": {"filter": [{"exists": {"field": "locations"}}]}})
        );
        assert_eq!(
            serde_json::to_value(QueryNode::match_all()).unwrap(),
            serde_json::json!({"match_all": {}})
        );
    }

    #[test]
    fn test_effective_minimum_should_match() {
        let only_should = BoolQuery::new().should(QueryNode::term("a", "1"));
        assert_eq!(only_should.effective_minimum_should_match(), 1);

        let with_filter = only_should.clone().filter(QueryNode::term("b", "2"));
        assert_eq!(with_filter.effective_minimum_should_match(), 0);
    }
}
