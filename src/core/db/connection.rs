/// Connection Management Module
///
/// This module defines the driver seam of dbcontrol and ships the bundled
/// SQLite driver. A connection is opened for exactly one statement and closed
/// right after it.

use crate::config::DatabaseConfig;
use crate::core::error::{DriverError, DriverResult};
use crate::core::value::{Row, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Opens connections to the configured database.
pub trait Connector {
    type Connection: Connection;

    /// Opens a fresh connection.
    fn connect(&self, config: &DatabaseConfig) -> DriverResult<Self::Connection>;
}

/// A single open database connection.
///
/// Work is not committed until [`Connection::commit`] is called; closing a
/// connection with uncommitted work discards it.
pub trait Connection {
    /// Runs one statement and returns every row it produced.
    ///
    /// Text holding more than one statement is refused before anything runs.
    fn execute(&mut self, sql: &str) -> DriverResult<Vec<Row>>;

    fn commit(&mut self) -> DriverResult<()>;

    /// Releases the connection. Calling it again is a no-op.
    fn close(&mut self) -> DriverResult<()>;
}

/// Connector for the bundled SQLite driver.
///
/// The DSN's database name selects the file `<data_dir>/<database>.db`.
/// Username, password, host and port are not used by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    data_dir: PathBuf,
}

impl SqliteConnector {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        SqliteConnector {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the database file for `config`.
    pub fn database_path(&self, config: &DatabaseConfig) -> PathBuf {
        self.data_dir.join(format!("{}.db", config.database))
    }
}

impl Connector for SqliteConnector {
    type Connection = SqliteConnection;

    fn connect(&self, config: &DatabaseConfig) -> DriverResult<SqliteConnection> {
        let path = self.database_path(config);
        debug!("Opening SQLite database at {:?}", path);

        let conn = rusqlite::Connection::open(&path)?;

        // foreign_keys must be set outside a transaction to take effect.
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            BEGIN;
        ",
        )?;

        Ok(SqliteConnection { conn: Some(conn) })
    }
}

/// An open SQLite connection with a pending transaction.
#[derive(Debug)]
pub struct SqliteConnection {
    /// None once closed
    conn: Option<rusqlite::Connection>,
}

impl SqliteConnection {
    fn handle(&self) -> DriverResult<&rusqlite::Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| DriverError::Other("connection already closed".to_string()))
    }
}

impl Connection for SqliteConnection {
    fn execute(&mut self, sql: &str) -> DriverResult<Vec<Row>> {
        let conn = self.handle()?;
        let mut batch = rusqlite::Batch::new(conn, sql);
        let Some(mut stmt) = batch.next()? else {
            return Err(DriverError::Other("no statement to execute".to_string()));
        };
        if batch.next()?.is_some() {
            return Err(DriverError::Other(
                "only one statement may be executed at a time".to_string(),
            ));
        }
        let column_count = stmt.column_count();

        // Stepping through `query` also runs statements that return no rows.
        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(Value::from(row.get_ref(i)?));
            }
            result.push(values);
        }
        Ok(result)
    }

    fn commit(&mut self) -> DriverResult<()> {
        self.handle()?.execute_batch(
            "
            COMMIT;
            BEGIN;
        ",
        )?;
        Ok(())
    }

    fn close(&mut self) -> DriverResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        if !conn.is_autocommit() {
            conn.execute_batch("ROLLBACK;")?;
        }
        conn.close().map_err(|(_, e)| DriverError::Sqlite(e))
    }
}
