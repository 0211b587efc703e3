//! Search field configuration

use crate::error::{AppError, Result};
use crate::models::SearchDomain;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A text field and the weight of matches on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFieldWeight {
    pub field: String,
    pub weight: f64,
}

impl SearchFieldWeight {
    pub fn new(field: impl Into<String>, weight: f64) -> Self {
        Self {
            field: field.into(),
            weight,
        }
    }
}

/// Field layout of one search domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainFieldsConfig {
    /// Field holding the document id
    pub id_field: String,

    /// Field holding the document type
    pub type_field: String,

    /// Field holding the document language(s)
    pub language_field: String,

    /// Weighted fields searched by the free-text matcher
    pub text_fields: Vec<SearchFieldWeight>,
}

impl DomainFieldsConfig {
    fn validate(&self, domain: &str) -> Result<()> {
        for (name, field) in [
            ("id_field", &self.id_field),
            ("type_field", &self.type_field),
            ("language_field", &self.language_field),
        ] {
            if field.trim().is_empty() {
                return Err(AppError::Configuration(format!(
                    "search.{}.{} must not be blank",
                    domain, name
                )));
            }
        }
        if self.text_fields.is_empty() {
            return Err(AppError::Configuration(format!(
                "search.{}.text_fields must not be empty",
                domain
            )));
        }
        for field in &self.text_fields {
            if field.field.trim().is_empty() || !field.weight.is_finite() || field.weight <= 0.0 {
                return Err(AppError::Configuration(format!(
                    "search.{} has invalid text field {:?}",
                    domain, field
                )));
            }
        }
        Ok(())
    }
}

/// Search compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_media_fields")]
    pub media: DomainFieldsConfig,

    #[serde(default = "default_subtitles_fields")]
    pub subtitles: DomainFieldsConfig,

    #[serde(default = "default_pages_fields")]
    pub pages: DomainFieldsConfig,

    /// Logical constraint names mapped to index fields
    #[serde(default = "default_field_aliases")]
    pub field_aliases: HashMap<String, String>,

    /// Maximum number of values in a single constraint list
    #[serde(default = "default_max_constraints")]
    pub max_constraints: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            media: default_media_fields(),
            subtitles: default_subtitles_fields(),
            pages: default_pages_fields(),
            field_aliases: default_field_aliases(),
            max_constraints: default_max_constraints(),
        }
    }
}

impl SearchConfig {
    /// Field layout for a domain
    pub fn domain(&self, domain: SearchDomain) -> &DomainFieldsConfig {
        match domain {
            SearchDomain::Media => &self.media,
            SearchDomain::Subtitles => &self.subtitles,
            SearchDomain::Pages => &self.pages,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.media.validate("media")?;
        self.subtitles.validate("subtitles")?;
        self.pages.validate("pages")?;
        if self.max_constraints == 0 {
            return Err(AppError::Configuration(
                "search.max_constraints must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_media_fields() -> DomainFieldsConfig {
    DomainFieldsConfig {
        id_field: "mid".to_string(),
        type_field: "type".to_string(),
        language_field: "languages.code".to_string(),
        text_fields: vec![
            SearchFieldWeight::new("titles.value", 3.0),
            SearchFieldWeight::new("tags", 2.0),
            SearchFieldWeight::new("descriptions.value", 1.0),
            SearchFieldWeight::new("broadcasters.value", 1.0),
        ],
    }
}

fn default_subtitles_fields() -> DomainFieldsConfig {
    DomainFieldsConfig {
        id_field: "parent".to_string(),
        type_field: "type".to_string(),
        language_field: "language".to_string(),
        text_fields: vec![SearchFieldWeight::new("content", 1.0)],
    }
}

fn default_pages_fields() -> DomainFieldsConfig {
    DomainFieldsConfig {
        id_field: "url".to_string(),
        type_field: "type".to_string(),
        language_field: "language".to_string(),
        text_fields: vec![
            SearchFieldWeight::new("title", 2.0),
            SearchFieldWeight::new("summary", 1.5),
            SearchFieldWeight::new("keywords", 1.5),
            SearchFieldWeight::new("paragraphs.body", 1.0),
        ],
    }
}

fn default_field_aliases() -> HashMap<String, String> {
    HashMap::from([
        ("descendant".to_string(), "descendantOf".to_string()),
        ("episode".to_string(), "episodeOf".to_string()),
        ("member".to_string(), "memberOf".to_string()),
    ])
}

fn default_max_constraints() -> usize {
    1000
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn domain_fields(mut self, domain: SearchDomain, fields: DomainFieldsConfig) -> Self {
        match domain {
            SearchDomain::Media => self.config.media = fields,
            SearchDomain::Subtitles => self.config.subtitles = fields,
            SearchDomain::Pages => self.config.pages = fields,
        }
        self
    }

    pub fn field_alias(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.config.field_aliases.insert(name.into(), field.into());
        self
    }

    pub fn max_constraints(mut self, max: usize) -> Self {
        self.config.max_constraints = max;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let mut fields = default_pages_fields();
        fields.text_fields.push(SearchFieldWeight::new("body", 0.0));
        let config = SearchConfigBuilder::new()
            .domain_fields(SearchDomain::Pages, fields)
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_domain_lookup() {
        let config = SearchConfig::default();
        assert_eq!(config.domain(SearchDomain::Pages).id_field, "url");
        assert_eq!(config.domain(SearchDomain::Media).id_field, "mid");
    }
}
