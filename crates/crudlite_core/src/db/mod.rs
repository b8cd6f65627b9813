//! SQLite connection bootstrap and error taxonomy.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection owned by a facade.
//! - Classify engine failures into a small, stable error taxonomy.
//!
//! # Invariants
//! - Engine errors are wrapped, never rewritten: `DbError::Sqlite` carries
//!   the original `rusqlite::Error`.
//! - Identifier, empty-clause and NaN-value failures are detected before any
//!   SQL text reaches the engine.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod config;
mod open;

pub use config::DatabaseConfig;
pub use open::{open_connection, MEMORY_IDENTIFIER};

pub type DbResult<T> = Result<T, DbError>;

/// Which part of a statement was supplied empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// Column definitions for `create_table`.
    Columns,
    /// Insert or update payload.
    Data,
    /// Equality filters for update/delete.
    Conditions,
}

impl ClauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Columns => "columns",
            Self::Data => "data",
            Self::Conditions => "conditions",
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    InvalidIdentifier { name: String },
    InvalidColumnType { literal: String },
    EmptyClause(ClauseKind),
    /// A value SQLite cannot store faithfully, such as a NaN real.
    InvalidValue { column: String },
}

/// Coarse failure category used for branching and log `error_code` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Store could not be opened (path, permissions, corruption).
    Connection,
    /// Nonexistent table or column.
    Schema,
    /// Uniqueness, not-null, foreign key or check constraint.
    Constraint,
    /// Statement would be syntactically invalid.
    MalformedStatement,
    /// Identifier or type literal rejected before SQL was built.
    InvalidIdentifier,
    /// Bound value rejected before SQL was executed.
    InvalidValue,
    /// Any other engine failure.
    Engine,
}

impl DbErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "db_connection",
            Self::Schema => "db_schema",
            Self::Constraint => "db_constraint",
            Self::MalformedStatement => "db_malformed_statement",
            Self::InvalidIdentifier => "db_invalid_identifier",
            Self::InvalidValue => "db_invalid_value",
            Self::Engine => "db_engine",
        }
    }
}

impl DbError {
    /// Classifies this error into the facade's error taxonomy.
    pub fn kind(&self) -> DbErrorKind {
        match self {
            Self::Sqlite(err) => classify_sqlite(err),
            Self::InvalidIdentifier { .. } | Self::InvalidColumnType { .. } => {
                DbErrorKind::InvalidIdentifier
            }
            Self::EmptyClause(_) => DbErrorKind::MalformedStatement,
            Self::InvalidValue { .. } => DbErrorKind::InvalidValue,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidIdentifier { name } => write!(
                f,
                "invalid identifier `{name}`; expected [A-Za-z_][A-Za-z0-9_]*"
            ),
            Self::InvalidColumnType { literal } => {
                write!(f, "invalid column type literal `{literal}`")
            }
            Self::EmptyClause(kind) => write!(f, "{} must not be empty", kind.as_str()),
            Self::InvalidValue { column } => {
                write!(f, "value for `{column}` is NaN and cannot be stored")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidIdentifier { .. }
            | Self::InvalidColumnType { .. }
            | Self::EmptyClause(_)
            | Self::InvalidValue { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

fn classify_sqlite(err: &rusqlite::Error) -> DbErrorKind {
    if let rusqlite::Error::SqliteFailure(inner, _) = err {
        match inner.code {
            rusqlite::ErrorCode::ConstraintViolation => return DbErrorKind::Constraint,
            rusqlite::ErrorCode::CannotOpen
            | rusqlite::ErrorCode::NotADatabase
            | rusqlite::ErrorCode::PermissionDenied
            | rusqlite::ErrorCode::DatabaseCorrupt => return DbErrorKind::Connection,
            _ => {}
        }
    }

    // SQLite reports missing tables/columns and parse failures as a generic
    // SQLITE_ERROR; only the message tells them apart.
    let message = err.to_string();
    if message.contains("no such table")
        || message.contains("no such column")
        || message.contains("has no column named")
    {
        DbErrorKind::Schema
    } else if message.contains("syntax error") || message.contains("incomplete input") {
        DbErrorKind::MalformedStatement
    } else {
        DbErrorKind::Engine
    }
}

#[cfg(test)]
mod tests {
    use super::{ClauseKind, DbError, DbErrorKind};
    use rusqlite::Connection;

    fn engine_error(sql: &str) -> DbError {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             INSERT INTO users (id, name) VALUES (1, 'Ann');",
        )
        .unwrap();
        conn.execute_batch(sql).unwrap_err().into()
    }

    #[test]
    fn missing_table_is_schema_error() {
        let err = engine_error("SELECT * FROM ghosts;");
        assert_eq!(err.kind(), DbErrorKind::Schema);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let err = engine_error("INSERT INTO users (id, nickname) VALUES (2, 'x');");
        assert_eq!(err.kind(), DbErrorKind::Schema);
    }

    #[test]
    fn duplicate_primary_key_is_constraint_error() {
        let err = engine_error("INSERT INTO users (id, name) VALUES (1, 'Bo');");
        assert_eq!(err.kind(), DbErrorKind::Constraint);
    }

    #[test]
    fn broken_sql_is_malformed_statement() {
        let err = engine_error("CREATE TABLE t ();");
        assert_eq!(err.kind(), DbErrorKind::MalformedStatement);
    }

    #[test]
    fn local_errors_have_stable_codes() {
        let err = DbError::EmptyClause(ClauseKind::Conditions);
        assert_eq!(err.kind().as_str(), "db_malformed_statement");
        assert_eq!(err.to_string(), "conditions must not be empty");

        let err = DbError::InvalidIdentifier {
            name: "users; DROP".to_string(),
        };
        assert_eq!(err.kind(), DbErrorKind::InvalidIdentifier);

        let err = DbError::InvalidValue {
            column: "score".to_string(),
        };
        assert_eq!(err.kind().as_str(), "db_invalid_value");
    }
}
