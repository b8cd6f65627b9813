//! SQLite-backed CRUD facade.

use super::CrudStore;
use crate::db::{open_connection, DatabaseConfig, DbError, DbResult, MEMORY_IDENTIFIER};
use crate::ident::Identifier;
use crate::model::fields::{Conditions, Record};
use crate::model::schema::TableSchema;
use crate::model::value::{RowValues, Value};
use crate::query::{self, Statement};
use log::{debug, error, info};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::time::Instant;

/// Owns one exclusive SQLite connection for its whole lifetime.
///
/// `Database` is `Send` but not `Sync`: callers sharing it across threads
/// must serialize access themselves, e.g. behind a `Mutex`.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the store named by `identifier` with default configuration.
    ///
    /// The identifier is handed to SQLite as-is, so `:memory:` yields a
    /// private in-memory store.
    pub fn open(identifier: impl AsRef<Path>) -> DbResult<Self> {
        Self::open_with_config(identifier, &DatabaseConfig::default())
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(MEMORY_IDENTIFIER)
    }

    pub fn open_with_config(
        identifier: impl AsRef<Path>,
        config: &DatabaseConfig,
    ) -> DbResult<Self> {
        let conn = open_connection(identifier, config)?;
        Ok(Self { conn })
    }

    /// Releases the connection. Consuming `self` makes later use a compile
    /// error.
    pub fn close(self) -> DbResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=facade status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                let err = DbError::from(err);
                error!(
                    "event=db_close module=facade status=error error_code={} error={}",
                    err.kind().as_str(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Reports whether `table` exists in this database.
    pub fn table_exists(&self, table: &str) -> DbResult<bool> {
        let table = Identifier::parse(table)?;
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    /// Returns the column names of `table` in declaration order, or an empty
    /// list when the table does not exist.
    pub fn table_columns(&self, table: &str) -> DbResult<Vec<String>> {
        let table = Identifier::parse(table)?;
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")?;
        let columns = stmt
            .query_map([table.as_str()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }

    fn execute(
        &self,
        event: &'static str,
        table: &str,
        statement: DbResult<Statement>,
    ) -> DbResult<usize> {
        self.observe(event, table, || {
            let statement = statement?;
            let changed = self
                .conn
                .execute(&statement.sql, params_from_iter(statement.params.iter()))?;
            Ok((changed, changed))
        })
    }

    fn query(&self, table: &str, statement: DbResult<Statement>) -> DbResult<Vec<RowValues>> {
        self.observe("db_read", table, || {
            let statement = statement?;
            let mut stmt = self.conn.prepare(&statement.sql)?;
            let column_count = stmt.column_count();
            let mut rows = stmt.query(params_from_iter(statement.params.iter()))?;

            let mut result = Vec::new();
            while let Some(row) = rows.next()? {
                let values = (0..column_count)
                    .map(|index| row.get::<_, Value>(index))
                    .collect::<rusqlite::Result<RowValues>>()?;
                result.push(values);
            }

            let count = result.len();
            Ok((result, count))
        })
    }

    /// Runs `op` and logs one metadata-only event. `op` returns its result
    /// plus the row count to report.
    fn observe<T>(
        &self,
        event: &'static str,
        table: &str,
        op: impl FnOnce() -> DbResult<(T, usize)>,
    ) -> DbResult<T> {
        let started_at = Instant::now();
        match op() {
            Ok((value, rows)) => {
                debug!(
                    "event={event} module=facade status=ok table={table} rows={rows} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event={event} module=facade status=error table={} duration_ms={} error_code={} error={}",
                    sanitize_table(table),
                    started_at.elapsed().as_millis(),
                    err.kind().as_str(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl CrudStore for Database {
    fn create_table(&self, table: &str, schema: &TableSchema) -> DbResult<()> {
        self.execute("db_create_table", table, query::create_table(table, schema))?;
        Ok(())
    }

    fn insert(&self, table: &str, data: &Record) -> DbResult<()> {
        self.execute("db_insert", table, query::insert(table, data))?;
        Ok(())
    }

    fn read(&self, table: &str, conditions: Option<&Conditions>) -> DbResult<Vec<RowValues>> {
        self.query(table, query::select(table, conditions))
    }

    fn update(&self, table: &str, data: &Record, conditions: &Conditions) -> DbResult<usize> {
        self.execute("db_update", table, query::update(table, data, conditions))
    }

    fn delete(&self, table: &str, conditions: &Conditions) -> DbResult<usize> {
        self.execute("db_delete", table, query::delete(table, conditions))
    }
}

// Rejected table names are caller-controlled; keep them out of log lines.
fn sanitize_table(table: &str) -> &str {
    if Identifier::parse(table).is_ok() {
        table
    } else {
        "<invalid>"
    }
}
