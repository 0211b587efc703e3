use crate::query::FieldFilter;

/// Request-scoped restrictions, passed explicitly to the compiler.
///
/// Every filter is added as a required, non-scoring clause of the compiled
/// query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchContext {
    filters: Vec<FieldFilter>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to published documents
    pub fn published_only() -> Self {
        Self::new().with_filter(FieldFilter::exact("workflow", "PUBLISHED"))
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
