//! Email allowlist.
//!
//! The allowlist is loaded once at startup from a newline-delimited file
//! and injected into the access policy; it is never mutated afterwards.
//! Emails are compared ASCII-case-insensitively.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors from loading the allowlist file.
#[derive(Debug)]
pub enum AllowlistError {
    /// The file could not be read.
    Read { path: PathBuf, details: String },
}

impl fmt::Display for AllowlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, details } => {
                write!(f, "failed to read allowlist {}: {details}", path.display())
            }
        }
    }
}

impl std::error::Error for AllowlistError {}

/// Set of emails permitted past protected paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailAllowlist {
    emails: HashSet<String>,
}

impl EmailAllowlist {
    /// Creates an allowlist from the given emails.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| normalize(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Parses newline-delimited text, skipping blank lines and `#` comments.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Loads the allowlist from a file.
    ///
    /// # Errors
    ///
    /// Returns [`AllowlistError::Read`] if the file cannot be read.
    pub fn load(path: &Path) -> login_gate_core::Result<Self, AllowlistError> {
        let contents = std::fs::read_to_string(path).map_err(|e| AllowlistError::Read {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(Self::parse(&contents))
    }

    /// Loads the allowlist, falling back to an empty one on failure.
    ///
    /// An empty allowlist rejects every email, so a missing file locks
    /// everyone out of protected paths rather than stopping startup.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(allowlist) => {
                tracing::info!(
                    path = %path.display(),
                    emails = allowlist.len(),
                    "Loaded email allowlist"
                );
                allowlist
            }
            Err(report) => {
                tracing::error!(
                    error = %report,
                    "Unable to load email allowlist; every email check will fail"
                );
                Self::default()
            }
        }
    }

    /// Returns true if `email` is on the allowlist.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_skips_blank_lines_and_comments() {
        let allowlist = EmailAllowlist::parse("a@example.com\n\n# admins\nb@example.com\r\n");
        assert_eq!(allowlist.len(), 2);
        assert!(allowlist.contains("a@example.com"));
        assert!(allowlist.contains("b@example.com"));
        assert!(!allowlist.contains(""));
    }

    #[test]
    fn contains_ignores_ascii_case() {
        let allowlist = EmailAllowlist::new(["Alice@Example.com"]);
        assert!(allowlist.contains("alice@example.com"));
        assert!(allowlist.contains(" ALICE@EXAMPLE.COM "));
        assert!(!allowlist.contains("x@evil.com"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "a@example.com").expect("write");
        writeln!(file, "b@example.com").expect("write");

        let allowlist = EmailAllowlist::load(file.path()).expect("load");
        assert!(allowlist.contains("a@example.com"));
        assert!(allowlist.contains("b@example.com"));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = EmailAllowlist::load(&dir.path().join("emails.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn load_or_empty_locks_everyone_out_on_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let allowlist = EmailAllowlist::load_or_empty(&dir.path().join("emails.txt"));
        assert!(allowlist.is_empty());
        assert!(!allowlist.contains("a@example.com"));
    }
}
