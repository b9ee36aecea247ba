/// Statement Execution Module
///
/// Owns the connect → execute → commit → fetch → close lifecycle of one
/// statement and turns driver failures into `DbControlError`s.

use super::connection::{Connection, Connector};
use crate::config::DatabaseConfig;
use crate::core::value::{Row, Value};
use crate::core::{DbControlError, Result};
use std::ops::{Deref, DerefMut};
use tracing::{debug, error, warn};

/// Closes the wrapped connection when dropped, on success and failure alike.
struct Session<C: Connection> {
    conn: C,
}

impl<C: Connection> Deref for Session<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.conn
    }
}

impl<C: Connection> DerefMut for Session<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.conn
    }
}

impl<C: Connection> Drop for Session<C> {
    fn drop(&mut self) {
        if let Err(e) = self.conn.close() {
            warn!("Failed to close database connection: {}", e);
        }
    }
}

/// Runs single statements against the configured database.
#[derive(Debug)]
pub struct Executor<C: Connector> {
    connector: C,
    config: DatabaseConfig,
}

impl<C: Connector> Executor<C> {
    pub fn new(connector: C, config: DatabaseConfig) -> Self {
        Executor { connector, config }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Executes `sql` on a fresh connection.
    ///
    /// # Arguments
    ///
    /// * `sql` - The statement to run, sent as-is
    /// * `commit` - Commit before closing; otherwise pending changes are discarded
    /// * `fetch` - Return the produced rows
    ///
    /// # Returns
    ///
    /// `Some(rows)` when `fetch` is set, `None` otherwise.
    ///
    /// # Errors
    ///
    /// `Connection` when the database cannot be reached, `Execution` when the
    /// statement or the commit fails. The connection is closed in every case.
    pub fn run(&self, sql: &str, commit: bool, fetch: bool) -> Result<Option<Vec<Row>>> {
        debug!(commit, fetch, "Executing: {}", sql);

        let conn = self.connector.connect(&self.config).map_err(|source| {
            error!("Cannot connect to {}: {}", self.config.redacted(), source);
            DbControlError::Connection {
                target: self.config.redacted(),
                source,
            }
        })?;
        let mut session = Session { conn };

        let execution_error = |source| {
            error!("Statement failed: {}: {}", sql, source);
            DbControlError::Execution {
                statement: sql.to_string(),
                source,
            }
        };

        let rows = session.execute(sql).map_err(execution_error)?;
        if commit {
            session.commit().map_err(execution_error)?;
        }

        Ok(fetch.then_some(rows))
    }

    /// Executes a scalar query and returns row 0, column 0 as an integer.
    pub fn run_scalar(&self, sql: &str) -> Result<i64> {
        let rows = self.run(sql, false, true)?.unwrap_or_default();
        match rows.first().and_then(|row| row.first()) {
            Some(Value::Integer(n)) => Ok(*n),
            other => Err(DbControlError::UnexpectedResult(format!(
                "expected an integer from `{}`, got {:?}",
                sql, other
            ))),
        }
    }
}
