//! Email normalization and validation
//!
//! Turns raw request input into a canonical [`Email`]: trimmed, lower-cased
//! and shaped like `local@domain.tld`. Canonical emails are the membership
//! keys of the waitlist, so two inputs that normalize to the same string are
//! the same signup.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Non-empty local part, `@`, then a domain with at least one dot.
/// Neither part may contain whitespace or another `@`.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Reasons an input is not accepted as an email
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailRejected {
    #[error("email must be a string")]
    NotAString,

    #[error("email is empty")]
    Empty,

    #[error("email is malformed")]
    Malformed,
}

/// A canonical email address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Email(String);

impl Email {
    /// Normalize and validate a raw string
    pub fn parse(raw: &str) -> Result<Self, EmailRejected> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            return Err(EmailRejected::Empty);
        }
        if !EMAIL_SHAPE.is_match(&value) {
            return Err(EmailRejected::Malformed);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize an arbitrary JSON value. Only strings are eligible.
pub fn normalize(raw: &Value) -> Result<Email, EmailRejected> {
    match raw {
        Value::String(s) => Email::parse(s),
        _ => Err(EmailRejected::NotAString),
    }
}

/// Normalize a raw string
pub fn normalize_str(raw: &str) -> Result<Email, EmailRejected> {
    Email::parse(raw)
}
