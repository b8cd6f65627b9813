//! Validated SQL identifiers and column type literals.
//!
//! # Responsibility
//! - Gate every table/column name and type literal before it is written
//!   into SQL text.
//!
//! # Invariants
//! - An `Identifier` matches `[A-Za-z_][A-Za-z0-9_]*` and is at most
//!   `MAX_IDENTIFIER_CHARS` long.
//! - Rendered identifiers are always double-quoted.
//! - A `ColumnType` never renders characters outside letters, digits,
//!   `_`, spaces, parentheses, commas and signs.

use crate::db::{DbError, DbResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MAX_IDENTIFIER_CHARS: usize = 128;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));
static TYPE_LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z][A-Za-z0-9_]*(?: [A-Za-z][A-Za-z0-9_]*)*(?: ?\( *[+-]?[0-9]+ *(?:, *[+-]?[0-9]+ *)?\))?$",
    )
    .expect("valid type literal regex")
});

/// A table or column name that is safe to embed in SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates `name` as a SQL identifier.
    ///
    /// # Errors
    /// - `DbError::InvalidIdentifier` when `name` is empty, too long, or
    ///   contains characters outside `[A-Za-z0-9_]`.
    pub fn parse(name: &str) -> DbResult<Self> {
        if name.chars().count() > MAX_IDENTIFIER_CHARS || !IDENTIFIER_RE.is_match(name) {
            return Err(DbError::InvalidIdentifier {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the double-quoted form used in generated SQL.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Declared type of a column.
///
/// SQLite only uses the declared type to pick a column affinity, so custom
/// literals such as `VARCHAR(255)` are accepted as long as they are
/// lexically safe. Serialized as its SQL literal and re-validated on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Blob,
    Numeric,
    Custom(TypeLiteral),
}

/// Custom type literal that passed lexical validation, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeLiteral(String);

impl TypeLiteral {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ColumnType {
    /// Validates and wraps a custom type literal.
    pub fn custom(literal: &str) -> DbResult<Self> {
        let trimmed = literal.trim();
        if !TYPE_LITERAL_RE.is_match(trimmed) {
            return Err(DbError::InvalidColumnType {
                literal: literal.to_string(),
            });
        }
        Ok(Self::Custom(TypeLiteral(trimmed.to_ascii_uppercase())))
    }

    /// SQL text for this type.
    pub fn as_sql(&self) -> &str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Numeric => "NUMERIC",
            Self::Custom(literal) => literal.as_str(),
        }
    }
}

impl FromStr for ColumnType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INTEGER" => Ok(Self::Integer),
            "REAL" => Ok(Self::Real),
            "TEXT" => Ok(Self::Text),
            "BLOB" => Ok(Self::Blob),
            "NUMERIC" => Ok(Self::Numeric),
            _ => Self::custom(s),
        }
    }
}

impl TryFrom<String> for ColumnType {
    type Error = DbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.as_sql().to_string()
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}
