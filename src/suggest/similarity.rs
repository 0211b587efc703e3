//! Prefix matching and scoring

use super::config::Similarity;

/// Prefix matcher with a bounded number of edits
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefix: Vec<char>,
    max_edits: usize,
    fuzzy: bool,
    similarity: Similarity,
}

impl PrefixMatcher {
    pub fn new(prefix: &str, max_edits: usize, fuzzy_min_length: usize, similarity: Similarity) -> Self {
        let prefix: Vec<char> = prefix.trim().to_lowercase().chars().collect();
        let fuzzy = max_edits > 0 && prefix.len() >= fuzzy_min_length;
        Self {
            prefix,
            max_edits,
            fuzzy,
            similarity,
        }
    }

    /// Edits needed to turn some prefix of `candidate` into the search
    /// prefix, `None` when above the limit
    pub fn edits(&self, candidate: &str) -> Option<usize> {
        let candidate: Vec<char> = candidate.to_lowercase().chars().collect();
        if !self.fuzzy {
            return candidate.starts_with(&self.prefix).then_some(0);
        }
        let distance = prefix_distance(&self.prefix, &candidate);
        (distance <= self.max_edits).then_some(distance)
    }

    /// Score of `candidate`, `None` when it does not match
    pub fn score(&self, candidate: &str) -> Option<f64> {
        let edits = self.edits(candidate)?;
        Some(match self.similarity {
            Similarity::Uniform => 1.0,
            Similarity::EditDistance => 1.0 / (1.0 + edits as f64),
        })
    }
}

/// Smallest Levenshtein distance between `prefix` and any prefix of `text`
fn prefix_distance(prefix: &[char], text: &[char]) -> usize {
    // row[j]: distance between the current prefix slice and text[..j]
    let mut row: Vec<usize> = (0..=text.len()).collect();
    for (i, p) in prefix.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = i + 1;
        for (j, t) in text.iter().enumerate() {
            let substitution = previous_diagonal + usize::from(p != t);
            previous_diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row.into_iter().min().unwrap_or(prefix.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(prefix: &str) -> PrefixMatcher {
        PrefixMatcher::new(prefix, 2, 3, Similarity::EditDistance)
    }

    #[test]
    fn test_short_prefix_is_exact() {
        let m = matcher("lu");
        assert_eq!(m.edits("lubach"), Some(0));
        assert_eq!(m.edits("Luitjes"), Some(0));
        assert_eq!(m.edits("cuba"), None);
    }

    #[test]
    fn test_fuzzy_prefix() {
        let m = matcher("liba");
        assert_eq!(m.edits("libanon"), Some(0));
        assert_eq!(m.edits("lubach"), Some(1));
        assert_eq!(m.edits("cuba"), Some(2));
        assert_eq!(m.edits("dubai"), Some(2));
        assert_eq!(m.edits("zondag"), None);
    }

    #[test]
    fn test_edit_distance_scores() {
        let m = matcher("liba");
        assert_eq!(m.score("libanon"), Some(1.0));
        assert_eq!(m.score("lubach"), Some(0.5));
    }

    #[test]
    fn test_prefix_distance() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(prefix_distance(&chars("abc"), &chars("abcdef")), 0);
        assert_eq!(prefix_distance(&chars("abc"), &chars("")), 3);
        assert_eq!(prefix_distance(&chars("abc"), &chars("axc")), 1);
    }
}
