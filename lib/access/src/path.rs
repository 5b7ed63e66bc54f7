//! Path patterns for access rules.
//!
//! A pattern is a case-sensitive path prefix: `/admin` covers `/admin`,
//! `/admin/users` and `/administrator`. A trailing `*` is stripped, so
//! `/static/*` covers everything under `/static/`. The patterns `/` and
//! `*` cover every path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A path prefix used by access rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PathPattern(String);

impl PathPattern {
    /// Creates a pattern, stripping surrounding whitespace and a trailing `*`.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let trimmed = pattern.trim();
        let prefix = trimmed.strip_suffix('*').unwrap_or(trimmed);
        Self(prefix.to_string())
    }

    /// Parses a comma-separated list of patterns, skipping empty entries.
    #[must_use]
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::new)
            .collect()
    }

    /// Returns the prefix this pattern matches.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `path` falls under this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.0.is_empty() || self.0 == "/" {
            return true;
        }
        path.starts_with(&self.0)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PathPattern {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for PathPattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathPattern> for String {
    fn from(pattern: PathPattern) -> Self {
        pattern.0
    }
}
