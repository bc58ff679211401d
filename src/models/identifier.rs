//! Path identifier classification shared by every entity lookup.
//!
//! Routes such as `/items/:identifier` accept a numeric id, a UUID, or a
//! natural key. The string is classified once here and repositories dispatch
//! on the variant.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$").expect("valid email regex"));

/// A classified lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Pure-digit string that fits a database id
    Id(i32),
    /// Hyphenated 36-character UUID
    Uuid(Uuid),
    /// Email-shaped string (only meaningful for users)
    Email(String),
    /// Anything else: name, id number, ...
    Natural(String),
}

impl Identifier {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse::<i32>() {
                return Identifier::Id(id);
            }
        }

        if raw.len() == 36 {
            if let Ok(uuid) = Uuid::parse_str(raw) {
                return Identifier::Uuid(uuid);
            }
        }

        if EMAIL_RE.is_match(raw) {
            return Identifier::Email(raw.to_string());
        }

        Identifier::Natural(raw.to_string())
    }

    /// The natural key for entities that have no email lookup; an email-shaped
    /// name is still a name.
    pub fn natural_key(&self) -> Option<&str> {
        match self {
            Identifier::Email(s) | Identifier::Natural(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{}", id),
            Identifier::Uuid(uuid) => write!(f, "{}", uuid),
            Identifier::Email(s) | Identifier::Natural(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_resolve_to_id() {
        assert_eq!(Identifier::parse("42"), Identifier::Id(42));
        assert_eq!(Identifier::parse(" 7 "), Identifier::Id(7));
    }

    #[test]
    fn test_uuid_resolves_to_uuid() {
        let raw = "6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b";
        assert_eq!(
            Identifier::parse(raw),
            Identifier::Uuid(Uuid::parse_str(raw).unwrap())
        );
    }

    #[test]
    fn test_email_resolves_to_email() {
        assert_eq!(
            Identifier::parse("jdoe@mail.com"),
            Identifier::Email("jdoe@mail.com".to_string())
        );
    }

    #[test]
    fn test_everything_else_is_natural() {
        assert_eq!(
            Identifier::parse("Mouse_1"),
            Identifier::Natural("Mouse_1".to_string())
        );
        assert_eq!(
            Identifier::parse("2021-00123"),
            Identifier::Natural("2021-00123".to_string())
        );
        // too large for an i32 id
        assert_eq!(
            Identifier::parse("99999999999"),
            Identifier::Natural("99999999999".to_string())
        );
        // simple (unhyphenated) uuid form is not accepted as a uuid
        assert!(matches!(
            Identifier::parse("6f1c2a7e3b4d4e5f8a9b0c1d2e3f4a5b"),
            Identifier::Natural(_)
        ));
    }

    #[test]
    fn test_natural_key() {
        assert_eq!(Identifier::parse("PC-01").natural_key(), Some("PC-01"));
        assert_eq!(Identifier::parse("a@b.io").natural_key(), Some("a@b.io"));
        assert_eq!(Identifier::parse("3").natural_key(), None);
        assert_eq!(
            Identifier::parse("6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b").natural_key(),
            None
        );
    }
}
