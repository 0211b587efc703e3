//! Query-language text fragments

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

/// Boolean operator joining sibling fragments
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum BooleanOperator {
    And,
    Or,
}

impl BooleanOperator {
    /// Separator placed between two joined fragments, e.g. `" AND "`
    pub fn separator(&self) -> String {
        format!(" {} ", self)
    }
}

/// An opaque, combinable unit of query-language text plus the operator used
/// to join it with its siblings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFragment {
    text: String,
    operator: BooleanOperator,
}

impl QueryFragment {
    pub fn new(text: impl Into<String>, operator: BooleanOperator) -> Self {
        Self {
            text: text.into(),
            operator,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn operator(&self) -> BooleanOperator {
        self.operator
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for QueryFragment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

const SPECIAL_CHARS: &[char] = &[
    '+', '-', '=', '&', '|', '>', '<', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?',
    ':', '\\', '/',
];

fn is_bare_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Render a term value, double-quoting it unless it is a bare word
pub fn quote_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_bare_char) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Backslash-escape query syntax characters (used where quoting is not
/// allowed, e.g. in prefix terms)
pub fn escape_term(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if SPECIAL_CHARS.contains(&c) || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
