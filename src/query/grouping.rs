//! Joining fragments into delimited boolean groups

use super::fragment::{BooleanOperator, QueryFragment};
use tracing::warn;

/// Combines fragments with a boolean operator.
///
/// Grouping is declared up front from the number of fragments the caller
/// expects, but the declaration never changes the output: delimiters are
/// emitted exactly when more than one fragment was actually joined. A
/// declaration that turns out wrong only logs a warning:
///
/// ```
/// use media_search_core::query::{BooleanGroupingBuilder, BooleanOperator};
///
/// let mut builder = BooleanGroupingBuilder::new(BooleanOperator::And, 2);
/// builder.append("A").append("B");
/// assert_eq!(builder.close().build().text(), "(A AND B)");
/// ```
#[derive(Debug, Clone)]
pub struct BooleanGroupingBuilder {
    operator: BooleanOperator,
    grouping: bool,
    parts: Vec<String>,
}

impl BooleanGroupingBuilder {
    /// Create a builder expecting `expected_fragments` fragments.
    ///
    /// The count sizes the buffer and is checked against the fragments
    /// actually appended; rendering only depends on the latter.
    pub fn new(operator: BooleanOperator, expected_fragments: usize) -> Self {
        Self {
            operator,
            grouping: expected_fragments > 1,
            parts: Vec::with_capacity(expected_fragments),
        }
    }

    /// Create a builder with no expected count; never warns
    pub fn grouped(operator: BooleanOperator) -> Self {
        Self {
            operator,
            grouping: true,
            parts: Vec::new(),
        }
    }

    /// Append a fragment. Blank fragments are skipped.
    pub fn append(&mut self, fragment: impl AsRef<str>) -> &mut Self {
        let fragment = fragment.as_ref().trim();
        if !fragment.is_empty() {
            self.parts.push(fragment.to_string());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn operator(&self) -> BooleanOperator {
        self.operator
    }

    /// Close the group, rendering delimiters around two or more fragments
    pub fn close(self) -> ClosedGroup {
        if !self.grouping && self.parts.len() > 1 {
            warn!(
                fragments = self.parts.len(),
                "grouping several fragments that were not declared"
            );
        }

        let joined = self.parts.join(&self.operator.separator());
        let text = if self.parts.len() > 1 {
            format!("({})", joined)
        } else {
            joined
        };

        ClosedGroup {
            operator: self.operator,
            text,
        }
    }
}

/// A closed group that only accepts trailing free text
#[derive(Debug, Clone)]
pub struct ClosedGroup {
    operator: BooleanOperator,
    text: String,
}

impl ClosedGroup {
    /// Concatenate unstructured text after the group with a single space.
    /// The text is not joined by the group's operator.
    pub fn free_text(mut self, text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        if !text.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(text);
        }
        self
    }

    pub fn build(self) -> QueryFragment {
        QueryFragment::new(self.text, self.operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_fragment_has_no_delimiters() {
        let mut builder = BooleanGroupingBuilder::new(BooleanOperator::And, 1);
        builder.append("A");
        assert_eq!(builder.close().build().text(), "A");
    }

    #[test]
    fn test_grouped_declared_single_append() {
        let mut builder = BooleanGroupingBuilder::grouped(BooleanOperator::Or);
        builder.append("A");
        assert_eq!(builder.close().build().text(), "A");
    }

    #[test]
    fn test_two_fragments_wrap() {
        let mut builder = BooleanGroupingBuilder::new(BooleanOperator::Or, 2);
        builder.append("A").append("B");
        let fragment = builder.close().build();
        assert_eq!(fragment.text(), "(A OR B)");
        assert_eq!(fragment.operator(), BooleanOperator::Or);
    }

    #[test]
    fn test_free_text_after_close() {
        let mut builder = BooleanGroupingBuilder::new(BooleanOperator::And, 2);
        builder.append("a:1").append("b:2");
        let fragment = builder.close().free_text("hello world").build();
        assert_eq!(fragment.text(), "(a:1 AND b:2) hello world");
    }

    #[test]
    fn test_free_text_without_structured_part() {
        let builder = BooleanGroupingBuilder::new(BooleanOperator::And, 0);
        let fragment = builder.close().free_text("  lubach ").build();
        assert_eq!(fragment.text(), "lubach");
    }

    #[test]
    fn test_undeclared_group_still_wraps() {
        let mut builder = BooleanGroupingBuilder::new(BooleanOperator::And, 1);
        builder.append("A").append("B");
        assert_eq!(builder.close().build().text(), "(A AND B)");
    }

    #[test]
    fn test_declared_group_with_single_fragment_is_bare() {
        let mut builder = BooleanGroupingBuilder::new(BooleanOperator::Or, 3);
        builder.append("A");
        assert_eq!(builder.close().build().text(), "A");
    }

    #[test]
    fn test_blank_fragments_skipped() {
        let mut builder = BooleanGroupingBuilder::new(BooleanOperator::And, 2);
        builder.append("A").append("   ");
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.close().build().text(), "A");
    }
}
