//! Connection bootstrap for the facade.
//!
//! # Responsibility
//! - Open the store named by the caller's identifier.
//! - Apply `DatabaseConfig` pragmas before handing the connection out.
//!
//! # Invariants
//! - The identifier is passed to SQLite uninterpreted; `:memory:` and URI
//!   handling belong to the engine.
//! - The returned connection is in autocommit mode.
//! - Double-quoted string literals are disabled, so a quoted name that does
//!   not resolve to a table or column is an error, never a string.

use super::{DatabaseConfig, DbError, DbResult};
use log::{error, info};
use rusqlite::config::DbConfig;
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Identifier SQLite treats as a private in-memory store.
pub const MEMORY_IDENTIFIER: &str = ":memory:";

/// Opens and configures one SQLite connection.
///
/// # Side effects
/// - Emits `db_open` logging events with mode, duration and status.
pub fn open_connection(
    identifier: impl AsRef<Path>,
    config: &DatabaseConfig,
) -> DbResult<Connection> {
    let identifier = identifier.as_ref();
    let mode = if identifier == Path::new(MEMORY_IDENTIFIER) {
        "memory"
    } else {
        "file"
    };
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match Connection::open(identifier) {
        Ok(conn) => conn,
        Err(err) => {
            let err = DbError::from(err);
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.kind().as_str(),
                err
            );
            return Err(err);
        }
    };

    match configure_connection(&conn, config) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.kind().as_str(),
                err
            );
            Err(err)
        }
    }
}

fn configure_connection(conn: &Connection, config: &DatabaseConfig) -> DbResult<()> {
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;
    let foreign_keys = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
    conn.busy_timeout(config.busy_timeout)?;
    Ok(())
}
