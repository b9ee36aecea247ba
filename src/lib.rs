//! dbcontrol: build and run table, insert, update, delete and search
//! statements against one configured relational database.
//!
//! Statements are assembled from caller input by plain string
//! interpolation. Nothing is escaped or bound as a parameter, so all
//! identifiers, conditions and values must already be safe SQL.

// Core infrastructure modules
pub mod core;

pub mod config;
pub mod operations;
pub mod statement;
pub mod tupleize;
pub mod type_check;

#[cfg(test)]
mod test_utils;

pub use config::{load_config, Config, DatabaseConfig, DEFAULT_DSN_VAR};
pub use crate::core::db::{Connection, Connector, Executor, SqliteConnector};
pub use crate::core::{DbControlError, ErrorKind, OneOrMany, OutcomeExt, Result, Row, Value, ValueKind};
pub use operations::{Database, SearchResult};
pub use statement::{quote_literal, Columns, ColumnSpec, ForeignKeySpec, Nullability, SearchOptions};
pub use tupleize::Assignment;
