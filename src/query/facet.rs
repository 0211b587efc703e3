//! Facet bucket ordering

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

/// Sort order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Requested ordering of facet buckets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum FacetSortDirective {
    ValueAsc,
    ValueDesc,
    CountAsc,
    CountDesc,
}

/// What buckets are ordered by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BucketKey {
    /// The bucket's term
    Term,
    /// The bucket's document count
    Count,
}

/// A single facet bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub value: String,
    pub count: u64,
}

impl FacetBucket {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Resolved bucket ordering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketOrder {
    pub key: BucketKey,
    pub order: SortOrder,
}

impl Default for BucketOrder {
    fn default() -> Self {
        Self {
            key: BucketKey::Count,
            order: SortOrder::Descending,
        }
    }
}

impl BucketOrder {
    /// Map a directive to a bucket ordering. Total: `None` orders by count,
    /// descending.
    pub fn resolve(directive: Option<FacetSortDirective>) -> Self {
        let (key, order) = match directive {
            Some(FacetSortDirective::ValueAsc) => (BucketKey::Term, SortOrder::Ascending),
            Some(FacetSortDirective::ValueDesc) => (BucketKey::Term, SortOrder::Descending),
            Some(FacetSortDirective::CountAsc) => (BucketKey::Count, SortOrder::Ascending),
            Some(FacetSortDirective::CountDesc) | None => (BucketKey::Count, SortOrder::Descending),
        };
        Self { key, order }
    }

    /// Like [`BucketOrder::resolve`] for a raw directive name; unrecognized
    /// names fall back to count, descending
    pub fn resolve_name(directive: Option<&str>) -> Self {
        Self::resolve(directive.and_then(|d| d.trim().parse().ok()))
    }

    /// Compare two buckets. Ties on count are broken by term, ascending.
    pub fn compare(&self, a: &FacetBucket, b: &FacetBucket) -> Ordering {
        match (self.key, self.order) {
            (BucketKey::Term, SortOrder::Ascending) => a.value.cmp(&b.value),
            (BucketKey::Term, SortOrder::Descending) => b.value.cmp(&a.value),
            (BucketKey::Count, SortOrder::Ascending) => {
                a.count.cmp(&b.count).then_with(|| a.value.cmp(&b.value))
            }
            (BucketKey::Count, SortOrder::Descending) => {
                b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value))
            }
        }
    }

    pub fn sort(&self, buckets: &mut [FacetBucket]) {
        buckets.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_names() {
        assert_eq!(
            "VALUE_ASC".parse::<FacetSortDirective>().unwrap(),
            FacetSortDirective::ValueAsc
        );
        assert_eq!(FacetSortDirective::CountDesc.to_string(), "COUNT_DESC");
        assert!("SIDEWAYS".parse::<FacetSortDirective>().is_err());
    }

    #[test]
    fn test_count_ties_broken_by_term() {
        let mut buckets = vec![
            FacetBucket::new("vpro", 3),
            FacetBucket::new("eo", 3),
            FacetBucket::new("kro", 5),
        ];
        BucketOrder::default().sort(&mut buckets);
        let values: Vec<_> = buckets.iter().map(|b| b.value.as_str()).collect();
        assert_eq!(values, vec!["kro", "eo", "vpro"]);
    }
}
