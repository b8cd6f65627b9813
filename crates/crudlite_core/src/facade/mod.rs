//! CRUD facade over one embedded SQLite connection.
//!
//! # Responsibility
//! - Expose table creation and equality-filtered CRUD as a small contract.
//! - Keep statement rendering in `query` and connection setup in `db`.
//!
//! # Invariants
//! - Every public call is one auto-committed statement; no transaction
//!   spans two calls.
//! - The facade holds no table metadata between calls.

mod database;

pub use database::Database;

use crate::db::DbResult;
use crate::model::fields::{Conditions, Record};
use crate::model::schema::TableSchema;
use crate::model::value::RowValues;

/// Generic CRUD contract implemented by [`Database`].
pub trait CrudStore {
    /// Creates `table` unless it already exists. An existing table keeps its
    /// original definition even when `schema` differs.
    fn create_table(&self, table: &str, schema: &TableSchema) -> DbResult<()>;

    fn insert(&self, table: &str, data: &Record) -> DbResult<()>;

    /// Returns matching rows in table column order. `None` or empty
    /// conditions return every row in storage order.
    fn read(&self, table: &str, conditions: Option<&Conditions>) -> DbResult<Vec<RowValues>>;

    /// Returns the number of rows changed.
    fn update(&self, table: &str, data: &Record, conditions: &Conditions) -> DbResult<usize>;

    /// Returns the number of rows removed.
    fn delete(&self, table: &str, conditions: &Conditions) -> DbResult<usize>;
}
