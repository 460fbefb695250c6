//! Allow-listed SQL identifiers.
//!
//! Identifiers (database, table, column, index and constraint names) cannot be
//! bound as query parameters, so every name that reaches DDL text goes through
//! [`Ident`]. Only ASCII letters, digits and underscores are accepted, and the
//! name must fit MySQL's 64 character identifier limit.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Maximum identifier length accepted by MySQL.
pub const MAX_IDENT_LEN: usize = 64;

/// A validated SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Ident(String);

impl Ident {
    /// Create a new identifier, panicking if it fails validation.
    ///
    /// Intended for compile-time constants such as the catalog. Prefer
    /// [`parse`](Self::parse) for anything read from the environment.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        if let Err(e) = validate(&s) {
            panic!("{e}");
        }
        Self(s)
    }

    /// Validate and wrap an identifier from untrusted input.
    pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
        let s = name.into();
        validate(&s)?;
        Ok(Self(s))
    }

    /// Return the raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the identifier backtick-quoted for MySQL.
    pub fn quoted(&self) -> String {
        // Validation already excludes backticks, quoting is for reserved words.
        format!("`{}`", self.0)
    }
}

fn validate(s: &str) -> CoreResult<()> {
    let fail = |reason: &str| CoreError::InvalidIdentifier {
        value: s.to_string(),
        reason: reason.to_string(),
    };

    if s.is_empty() {
        return Err(fail("must not be empty"));
    }
    if s.len() > MAX_IDENT_LEN {
        return Err(fail("longer than 64 characters"));
    }
    if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(fail("only ASCII letters, digits and '_' are allowed"));
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        return Err(fail("must not be purely numeric"));
    }
    Ok(())
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Ident {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Ident {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Ident {
    type Error = CoreError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ident {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl PartialEq<str> for Ident {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Ident {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Join identifiers into a quoted, comma separated column list.
pub fn quoted_list(idents: &[Ident]) -> String {
    idents
        .iter()
        .map(Ident::quoted)
        .collect::<Vec<_>>()
        .join(", ")
}
