use crate::error::{AppError, Result};
use crate::query::FieldFilter;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::{Validate, ValidationError};

/// Kind of documents a search runs against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SearchDomain {
    Subtitles,
    Media,
    Pages,
}

/// How a text match contributes to the boolean query
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum MatchMode {
    /// Only contributes to the score
    #[default]
    Should,
    /// Required to match
    Must,
}

/// Free-text part of a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TextMatcher {
    #[validate(length(max = 1024))]
    pub value: String,

    #[serde(default)]
    pub match_mode: MatchMode,
}

impl TextMatcher {
    pub fn new(value: impl Into<String>, match_mode: MatchMode) -> Self {
        Self {
            value: value.into(),
            match_mode,
        }
    }

    pub fn should(value: impl Into<String>) -> Self {
        Self::new(value, MatchMode::Should)
    }

    pub fn must(value: impl Into<String>) -> Self {
        Self::new(value, MatchMode::Must)
    }

    /// Blank values are treated as if no matcher was given
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

fn no_blank_values(values: &Vec<String>) -> std::result::Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        let mut err = ValidationError::new("blank_value");
        err.message = Some("constraint lists must not contain blank values".into());
        return Err(err);
    }
    Ok(())
}

/// Parsed, domain-level search criteria. Immutable per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Optional free-text matcher
    pub text: Option<TextMatcher>,

    /// Any of these ids
    #[validate(custom(function = "no_blank_values"))]
    pub ids: Vec<String>,

    /// Any of these types
    #[validate(custom(function = "no_blank_values"))]
    pub types: Vec<String>,

    /// Any of these languages
    #[validate(custom(function = "no_blank_values"))]
    pub languages: Vec<String>,

    /// Additional field constraints, all required
    pub filters: Vec<FieldFilter>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, matcher: TextMatcher) -> Self {
        self.text = Some(matcher);
        self
    }

    pub fn with_ids(mut self, ids: Vec<impl Into<String>>) -> Self {
        push_distinct(&mut self.ids, ids);
        self
    }

    pub fn with_types(mut self, types: Vec<impl Into<String>>) -> Self {
        push_distinct(&mut self.types, types);
        self
    }

    pub fn with_languages(mut self, languages: Vec<impl Into<String>>) -> Self {
        push_distinct(&mut self.languages, languages);
        self
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        if !self.filters.contains(&filter) {
            self.filters.push(filter);
        }
        self
    }

    /// The text matcher, unless absent or blank
    pub fn text_matcher(&self) -> Option<&TextMatcher> {
        self.text.as_ref().filter(|m| !m.is_blank())
    }

    /// True when nothing at all constrains the search
    pub fn is_empty(&self) -> bool {
        self.text_matcher().is_none()
            && self.ids.is_empty()
            && self.types.is_empty()
            && self.languages.is_empty()
            && self.filters.is_empty()
    }

    /// Check the containers for malformed content
    pub fn check(&self, max_constraints: usize) -> Result<()> {
        self.validate()?;
        if let Some(text) = &self.text {
            text.validate()?;
        }
        for (name, values) in [
            ("ids", &self.ids),
            ("types", &self.types),
            ("languages", &self.languages),
        ] {
            if values.len() > max_constraints {
                return Err(AppError::invalid_argument(format!(
                    "{} has {} values, at most {} allowed",
                    name,
                    values.len(),
                    max_constraints
                )));
            }
        }
        if self.filters.len() > max_constraints {
            return Err(AppError::invalid_argument(format!(
                "{} field filters given, at most {} allowed",
                self.filters.len(),
                max_constraints
            )));
        }
        for filter in &self.filters {
            filter.validate()?;
        }
        Ok(())
    }
}

fn push_distinct(target: &mut Vec<String>, values: Vec<impl Into<String>>) {
    for value in values {
        let value = value.into();
        if !target.contains(&value) {
            target.push(value);
        }
    }
}
