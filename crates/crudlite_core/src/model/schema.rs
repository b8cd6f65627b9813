//! Table schema descriptor supplied to `create_table`.

use crate::db::DbResult;
use crate::ident::{ColumnType, Identifier};
use serde::{Deserialize, Serialize};

/// Column-level constraint rendered after the type literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
    Unique,
    /// `REFERENCES "table" ("column")`; enforced only when the connection
    /// has foreign keys enabled.
    References { table: String, column: String },
}

impl ColumnConstraint {
    /// SQL text for this constraint. Referenced names are validated like any
    /// other identifier.
    pub fn to_sql(&self) -> DbResult<String> {
        Ok(match self {
            Self::PrimaryKey => "PRIMARY KEY".to_string(),
            Self::NotNull => "NOT NULL".to_string(),
            Self::Unique => "UNIQUE".to_string(),
            Self::References { table, column } => format!(
                "REFERENCES {} ({})",
                Identifier::parse(table)?.quoted(),
                Identifier::parse(column)?.quoted()
            ),
        })
    }
}

/// One column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: ColumnType,
    #[serde(default)]
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn primary_key(self) -> Self {
        self.constraint(ColumnConstraint::PrimaryKey)
    }

    pub fn not_null(self) -> Self {
        self.constraint(ColumnConstraint::NotNull)
    }

    pub fn unique(self) -> Self {
        self.constraint(ColumnConstraint::Unique)
    }

    pub fn references(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.constraint(ColumnConstraint::References {
            table: table.into(),
            column: column.into(),
        })
    }

    fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
        self
    }
}

/// Ordered column definitions for one table. Not retained by the facade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plain `name TYPE` column.
    pub fn column(self, name: impl Into<String>, data_type: ColumnType) -> Self {
        self.with_column(ColumnDef::new(name, data_type))
    }

    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
