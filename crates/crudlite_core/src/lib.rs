//! Generic CRUD facade over one embedded SQLite connection.
//!
//! Callers describe tables, records and equality filters with typed values;
//! the facade renders parameterized SQL, executes it, and auto-commits each
//! call. Identifiers are validated before they reach SQL text.

pub mod db;
pub mod facade;
pub mod ident;
pub mod logging;
pub mod model;
pub mod query;

pub use db::{ClauseKind, DatabaseConfig, DbError, DbErrorKind, DbResult};
pub use facade::{CrudStore, Database};
pub use ident::{ColumnType, Identifier, TypeLiteral};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::fields::{Conditions, Record};
pub use model::schema::{ColumnConstraint, ColumnDef, TableSchema};
pub use model::value::{RowValues, Value};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
