//! The public operations: each one validates its input, builds one statement
//! and runs it through the [`Executor`].

use crate::config::{load_config, Config, DatabaseConfig};
use crate::core::db::{Connector, Executor, SqliteConnector};
use crate::core::value::{OneOrMany, Row, Value};
use crate::core::{DbControlError, Result};
use crate::statement::{
    build_create_table, build_delete, build_drop_table, build_insert, build_select,
    build_update, ColumnSpec, ForeignKeySpec, SearchOptions,
};
use crate::tupleize::Assignment;
use std::path::Path;
use tracing::{info, warn};

/// Result of [`Database::search`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Rows(Vec<Row>),
    /// Set when the search was a count
    Count(i64),
}

impl SearchResult {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            SearchResult::Rows(rows) => Some(rows),
            SearchResult::Count(_) => None,
        }
    }

    pub fn count(&self) -> Option<i64> {
        match self {
            SearchResult::Count(n) => Some(*n),
            SearchResult::Rows(_) => None,
        }
    }
}

/// Entry point of dbcontrol.
///
/// Every call opens its own connection, runs a single statement and closes
/// the connection again; no state is shared between calls.
#[derive(Debug)]
pub struct Database<C: Connector = SqliteConnector> {
    executor: Executor<C>,
}

impl Database<SqliteConnector> {
    /// Builds a SQLite-backed database from a parsed configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let db_config = config.database_config()?;
        info!("Using database {}", db_config.redacted());
        Ok(Database::new(SqliteConnector::new(config.data_dir()), db_config))
    }

    /// Loads a TOML configuration file and builds a SQLite-backed database.
    pub fn open<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        Self::from_config(&load_config(config_path)?)
    }
}

impl<C: Connector> Database<C> {
    pub fn new(connector: C, config: DatabaseConfig) -> Self {
        Database {
            executor: Executor::new(connector, config),
        }
    }

    pub fn executor(&self) -> &Executor<C> {
        &self.executor
    }

    /// Creates `table` unless it already exists.
    ///
    /// With `auto_increment`, the `PRIMARY KEY` column is declared
    /// `AUTO_INCREMENT`. Each foreign key carries at most one referential
    /// action: ON DELETE when given, otherwise ON UPDATE.
    pub fn create_table(
        &self,
        table: &str,
        columns: &[ColumnSpec],
        foreign_keys: &[ForeignKeySpec],
        auto_increment: bool,
    ) -> Result<()> {
        let sql = validated(build_create_table(table, columns, foreign_keys, auto_increment))?;
        self.executor.run(&sql, true, false)?;
        Ok(())
    }

    /// Drops `table` if it exists. Its data is lost.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        let sql = validated(build_drop_table(table))?;
        self.executor.run(&sql, true, false)?;
        Ok(())
    }

    /// Updates the rows of `table` matching `condition`.
    ///
    /// **Without a condition every row of the table is updated.** Values are
    /// inserted as-is; quote text literals with
    /// [`quote_literal`](crate::statement::quote_literal).
    pub fn update_table(
        &self,
        table: &str,
        assignments: &OneOrMany<Assignment>,
        condition: Option<&str>,
    ) -> Result<()> {
        let sql = validated(build_update(table, assignments, condition))?;
        self.executor.run(&sql, true, false)?;
        Ok(())
    }

    /// Inserts one row into `table`.
    pub fn insert_to_table(
        &self,
        table: &str,
        columns: &OneOrMany<String>,
        values: &OneOrMany<Value>,
    ) -> Result<()> {
        let sql = validated(build_insert(table, columns, values))?;
        self.executor.run(&sql, true, false)?;
        Ok(())
    }

    /// Selects rows from `table`, or counts them when `options.count` is set.
    ///
    /// ```no_run
    /// use dbcontrol::{Database, SearchOptions};
    ///
    /// let db = Database::open("dbcontrol.toml")?;
    /// let res = db.search("TEST", &SearchOptions::new().count().condition("COL1 >= 150000"))?;
    /// println!("{:?}", res.count());
    /// # Ok::<(), dbcontrol::DbControlError>(())
    /// ```
    pub fn search(&self, table: &str, options: &SearchOptions) -> Result<SearchResult> {
        let sql = validated(build_select(table, options))?;
        if options.count {
            Ok(SearchResult::Count(self.executor.run_scalar(&sql)?))
        } else {
            let rows = self.executor.run(&sql, false, true)?.unwrap_or_default();
            Ok(SearchResult::Rows(rows))
        }
    }

    /// Deletes the rows of `table` matching `condition`, or all rows when
    /// `all` is set. Exactly one of the two must be given.
    pub fn delete_entry(&self, table: &str, condition: Option<&str>, all: bool) -> Result<()> {
        let sql = validated(build_delete(table, condition, all))?;
        self.executor.run(&sql, true, false)?;
        Ok(())
    }

    /// Runs caller-supplied SQL unchanged.
    ///
    /// This bypasses every check in this crate; only blank SQL is refused.
    /// Returns the rows when `fetch` is set.
    ///
    /// ```no_run
    /// use dbcontrol::Database;
    ///
    /// let db = Database::open("dbcontrol.toml")?;
    /// let res = db.run_custom_query("SELECT COUNT(*) FROM TEST_TABLE;", false, true)?;
    /// println!("{:?}", res); // Some([[Integer(12)]])
    /// # Ok::<(), dbcontrol::DbControlError>(())
    /// ```
    pub fn run_custom_query(&self, sql: &str, commit: bool, fetch: bool) -> Result<Option<Vec<Row>>> {
        if sql.trim().is_empty() {
            return validated(Err(DbControlError::InvalidArgument(
                "cannot execute an empty SQL query".to_string(),
            )));
        }
        self.executor.run(sql, commit, fetch)
    }
}

/// Logs builder rejections; they never reach the executor.
fn validated<T>(built: Result<T>) -> Result<T> {
    if let Err(e) = &built {
        warn!("Rejected before execution: {}", e);
    }
    built
}
