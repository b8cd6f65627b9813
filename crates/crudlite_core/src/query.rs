//! Typed statement builder for the CRUD facade.
//!
//! # Responsibility
//! - Render create/insert/select/update/delete requests into SQL text plus
//!   an ordered list of bound parameters.
//!
//! # Invariants
//! - Identifiers reach SQL text only after `Identifier::parse` and always
//!   double-quoted.
//! - Values never reach SQL text; each one becomes a `?` placeholder and a
//!   matching entry in `Statement::params`, in placeholder order.
//! - Empty column/data/condition sets are rejected with
//!   `DbError::EmptyClause` instead of producing malformed SQL.
//! - A NaN real is rejected with `DbError::InvalidValue`; SQLite would
//!   store it as NULL.

use crate::db::{ClauseKind, DbError, DbResult};
use crate::ident::Identifier;
use crate::model::fields::{Conditions, Record};
use crate::model::schema::{ColumnDef, TableSchema};
use crate::model::value::Value;

/// Rendered SQL with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// One renderable piece of a statement.
#[derive(Debug, Clone, Copy)]
pub enum Clause<'a> {
    /// `"name" TYPE [constraints]` inside `CREATE TABLE`.
    Definition(&'a ColumnDef),
    /// Payload column bound to a value: an insert column or a `SET` entry.
    Assignment(&'a str, &'a Value),
    /// `"name" = ?` inside `WHERE`.
    Equality(&'a str, &'a Value),
}

impl Clause<'_> {
    /// Renders this clause's SQL text and pushes its value, if any.
    ///
    /// `Assignment` renders as `"name" = ?`; inserts split column and value
    /// instead.
    fn render(&self, params: &mut Vec<Value>) -> DbResult<String> {
        match self {
            Self::Definition(column) => {
                let name = Identifier::parse(&column.name)?;
                let mut sql = format!("{} {}", name.quoted(), column.data_type.as_sql());
                for constraint in &column.constraints {
                    sql.push(' ');
                    sql.push_str(&constraint.to_sql()?);
                }
                Ok(sql)
            }
            Self::Assignment(name, value) | Self::Equality(name, value) => {
                let name = Identifier::parse(name)?;
                params.push(bindable(&name, value)?);
                Ok(format!("{} = ?", name.quoted()))
            }
        }
    }

    fn column(&self) -> DbResult<Identifier> {
        match self {
            Self::Definition(column) => Identifier::parse(&column.name),
            Self::Assignment(name, _) | Self::Equality(name, _) => Identifier::parse(name),
        }
    }

    fn value(&self) -> Option<&Value> {
        match self {
            Self::Definition(_) => None,
            Self::Assignment(_, value) | Self::Equality(_, value) => Some(*value),
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS "<table>" (<definitions>)`.
pub fn create_table(table: &str, schema: &TableSchema) -> DbResult<Statement> {
    let table = Identifier::parse(table)?;
    if schema.is_empty() {
        return Err(DbError::EmptyClause(ClauseKind::Columns));
    }

    let mut params = Vec::new();
    let definitions = schema
        .columns
        .iter()
        .map(|column| Clause::Definition(column).render(&mut params))
        .collect::<DbResult<Vec<_>>>()?;

    Ok(Statement {
        sql: format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            table.quoted(),
            definitions.join(", ")
        ),
        params,
    })
}

/// `INSERT INTO "<table>" (<columns>) VALUES (?, ...)`.
pub fn insert(table: &str, data: &Record) -> DbResult<Statement> {
    let table = Identifier::parse(table)?;
    if data.is_empty() {
        return Err(DbError::EmptyClause(ClauseKind::Data));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (name, value) in data.iter() {
        let clause = Clause::Assignment(name, value);
        let column = clause.column()?;
        if let Some(value) = clause.value() {
            params.push(bindable(&column, value)?);
        }
        columns.push(column.quoted());
    }
    let placeholders = vec!["?"; columns.len()].join(", ");

    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.quoted(),
            columns.join(", "),
            placeholders
        ),
        params,
    })
}

/// `SELECT * FROM "<table>" [WHERE ...]`. Absent or empty conditions select
/// every row.
pub fn select(table: &str, conditions: Option<&Conditions>) -> DbResult<Statement> {
    let table = Identifier::parse(table)?;
    let mut sql = format!("SELECT * FROM {}", table.quoted());
    let mut params = Vec::new();

    if let Some(conditions) = conditions.filter(|conditions| !conditions.is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(&where_clause(conditions, &mut params)?);
    }

    Ok(Statement { sql, params })
}

/// `UPDATE "<table>" SET ... WHERE ...`. Data values bind before condition
/// values.
pub fn update(table: &str, data: &Record, conditions: &Conditions) -> DbResult<Statement> {
    let table = Identifier::parse(table)?;
    if data.is_empty() {
        return Err(DbError::EmptyClause(ClauseKind::Data));
    }
    if conditions.is_empty() {
        return Err(DbError::EmptyClause(ClauseKind::Conditions));
    }

    let mut params = Vec::with_capacity(data.len() + conditions.len());
    let assignments = data
        .iter()
        .map(|(name, value)| Clause::Assignment(name, value).render(&mut params))
        .collect::<DbResult<Vec<_>>>()?;
    let filter = where_clause(conditions, &mut params)?;

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {}",
            table.quoted(),
            assignments.join(", "),
            filter
        ),
        params,
    })
}

/// `DELETE FROM "<table>" WHERE ...`.
pub fn delete(table: &str, conditions: &Conditions) -> DbResult<Statement> {
    let table = Identifier::parse(table)?;
    if conditions.is_empty() {
        return Err(DbError::EmptyClause(ClauseKind::Conditions));
    }

    let mut params = Vec::with_capacity(conditions.len());
    let filter = where_clause(conditions, &mut params)?;

    Ok(Statement {
        sql: format!("DELETE FROM {} WHERE {}", table.quoted(), filter),
        params,
    })
}

fn bindable(column: &Identifier, value: &Value) -> DbResult<Value> {
    match value {
        Value::Real(real) if real.is_nan() => Err(DbError::InvalidValue {
            column: column.as_str().to_string(),
        }),
        _ => Ok(value.clone()),
    }
}

fn where_clause(conditions: &Conditions, params: &mut Vec<Value>) -> DbResult<String> {
    let filters = conditions
        .iter()
        .map(|(name, value)| Clause::Equality(name, value).render(params))
        .collect::<DbResult<Vec<_>>>()?;
    Ok(filters.join(" AND "))
}
