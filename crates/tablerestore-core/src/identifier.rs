//! Validated SQL identifiers
//!
//! Table and column names come straight from the backup file and end up in
//! statement text. They are only accepted when they match
//! `[A-Za-z_][A-Za-z0-9_]*`, and are always emitted double-quoted so reserved
//! words such as `order` still work.

use std::fmt;

use crate::error::IdentifierError;

/// Maximum length for table and column names
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// A table or column name that is safe to interpolate into SQL.
///
/// # Examples
///
/// ```rust
/// use tablerestore_core::SqlIdentifier;
///
/// let users = SqlIdentifier::new("users").unwrap();
/// assert_eq!(users.quoted(), "\"users\"");
///
/// assert!(SqlIdentifier::new("").is_err());
/// assert!(SqlIdentifier::new("1st").is_err());
/// assert!(SqlIdentifier::new("users; DROP TABLE users").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    pub fn new(name: &str) -> Result<Self, IdentifierError> {
        let mut chars = name.chars();
        let first = chars.next().ok_or(IdentifierError::Empty)?;

        if name.len() > MAX_IDENTIFIER_LENGTH {
            return Err(IdentifierError::TooLong {
                name: name.to_string(),
                length: name.len(),
                max: MAX_IDENTIFIER_LENGTH,
            });
        }

        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(IdentifierError::InvalidStart {
                name: name.to_string(),
            });
        }

        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(IdentifierError::InvalidCharacters {
                name: name.to_string(),
            });
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier wrapped in double quotes. Validation guarantees there is
    /// no embedded quote to escape.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// SQLite compares identifiers case-insensitively (ASCII only).
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SqlIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for name in ["users", "_private", "order", "exchange_pairs", "T1", "a"] {
            assert!(SqlIdentifier::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_empty_identifier() {
        assert_eq!(SqlIdentifier::new(""), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_invalid_start() {
        assert!(matches!(
            SqlIdentifier::new("9lives"),
            Err(IdentifierError::InvalidStart { .. })
        ));
        assert!(matches!(
            SqlIdentifier::new("-dash"),
            Err(IdentifierError::InvalidStart { .. })
        ));
    }

    #[test]
    fn test_injection_attempts_rejected() {
        for name in [
            "users; DROP TABLE users",
            "users\"",
            "name) VALUES (1); --",
            "users--",
            "sp ace",
            "naïve",
        ] {
            assert!(
                matches!(
                    SqlIdentifier::new(name),
                    Err(IdentifierError::InvalidCharacters { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_too_long() {
        let name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(matches!(
            SqlIdentifier::new(&name),
            Err(IdentifierError::TooLong { length: 129, .. })
        ));
        assert!(SqlIdentifier::new(&"a".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
    }

    #[test]
    fn test_quoted_and_matches() {
        let id = SqlIdentifier::new("Users").unwrap();
        assert_eq!(id.quoted(), "\"Users\"");
        assert!(id.matches("users"));
        assert!(id.matches("USERS"));
        assert!(!id.matches("user"));
    }
}
