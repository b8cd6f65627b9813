//! Caller-facing data shapes for CRUD requests and results.
//!
//! # Responsibility
//! - Define the value, record, condition set and schema descriptor types
//!   the facade accepts.
//! - Keep names and values in separate slots so statement building never
//!   has to guess which is which.
//!
//! # Invariants
//! - Key order in `Record`/`Conditions`/`TableSchema` is insertion order and
//!   drives generated column order.
//! - Setting an existing key replaces its value in place.

pub mod fields;
pub mod schema;
pub mod value;
