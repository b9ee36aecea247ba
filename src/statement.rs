//! SQL statement builders.
//!
//! Each builder takes already-structured input and returns the SQL text for
//! one statement. Identifiers, conditions and values are interpolated as-is:
//! nothing here escapes or binds parameters, so every string passed in must
//! already be safe SQL. [`quote_literal`] is available for callers that need
//! to turn raw text into a string literal.

use crate::core::value::{OneOrMany, Value, ValueKind};
use crate::core::{DbControlError, Result};
use crate::tupleize::{to_assignment_string, Assignment};
use crate::type_check::kinds_match;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Column constraint accepted by CREATE TABLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    Null,
    NotNull,
    PrimaryKey,
}

impl Nullability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nullability::Null => "NULL",
            Nullability::NotNull => "NOT NULL",
            Nullability::PrimaryKey => "PRIMARY KEY",
        }
    }
}

impl fmt::Display for Nullability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nullability {
    type Err = DbControlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "NULL" => Ok(Nullability::Null),
            "NOT NULL" => Ok(Nullability::NotNull),
            "PRIMARY KEY" => Ok(Nullability::PrimaryKey),
            other => Err(DbControlError::Validation(format!(
                "expected NULL, NOT NULL or PRIMARY KEY, got `{}`",
                other
            ))),
        }
    }
}

/// One column definition of a CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub sql_type: String,
    pub nullability: Nullability,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, nullability: Nullability) -> Self {
        ColumnSpec {
            name: name.into(),
            sql_type: sql_type.into(),
            nullability,
        }
    }
}

/// Builds a column from a loose `(name, type, nullability)` tuple of text values.
impl TryFrom<&[Value]> for ColumnSpec {
    type Error = DbControlError;

    fn try_from(fields: &[Value]) -> Result<Self> {
        const KINDS: [ValueKind; 3] = [ValueKind::Text, ValueKind::Text, ValueKind::Text];

        if fields.len() != KINDS.len() || !kinds_match(fields, &KINDS) {
            return Err(DbControlError::Validation(format!(
                "column definition must be (name, type, nullability) text, got {:?}",
                fields
            )));
        }

        Ok(ColumnSpec::new(
            text(&fields[0]),
            text(&fields[1]),
            text(&fields[2]).parse()?,
        ))
    }
}

/// A FOREIGN KEY clause.
///
/// At most one referential action is emitted: `on_delete` when present,
/// otherwise `on_update`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeySpec {
    pub local_column: String,
    pub ref_table: String,
    pub ref_column: String,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

impl ForeignKeySpec {
    pub fn new(
        local_column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        ForeignKeySpec {
            local_column: local_column.into(),
            ref_table: ref_table.into(),
            ref_column: ref_column.into(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn on_delete(mut self, action: impl Into<String>) -> Self {
        self.on_delete = Some(action.into());
        self
    }

    pub fn on_update(mut self, action: impl Into<String>) -> Self {
        self.on_update = Some(action.into());
        self
    }

    fn to_sql(&self) -> String {
        let mut clause = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            self.local_column, self.ref_table, self.ref_column
        );

        let action = match (&self.on_delete, &self.on_update) {
            (Some(delete), update) => {
                if update.is_some() {
                    warn!(
                        column = %self.local_column,
                        "foreign key has both ON DELETE and ON UPDATE; only ON DELETE is emitted"
                    );
                }
                Some(("ON DELETE", delete))
            }
            (None, Some(update)) => Some(("ON UPDATE", update)),
            (None, None) => None,
        };

        if let Some((keyword, action)) = action {
            clause.push_str(&format!(" {} {}", keyword, action));
        }
        clause
    }
}

/// Builds a foreign key from a loose tuple of 3, 4 or 5 values.
///
/// `(col, table, ref_col)` is a plain reference, a 4th text value is the
/// ON DELETE action, and a 5-tuple carries `(on_delete, on_update)` where
/// either may be `Null`.
impl TryFrom<&[Value]> for ForeignKeySpec {
    type Error = DbControlError;

    fn try_from(fields: &[Value]) -> Result<Self> {
        const REFERENCE: [ValueKind; 3] = [ValueKind::Text, ValueKind::Text, ValueKind::Text];

        let invalid = || {
            DbControlError::Validation(format!(
                "foreign key must be (column, table, column[, on_delete[, on_update]]), got {:?}",
                fields
            ))
        };

        if !(3..=5).contains(&fields.len()) || !kinds_match(&fields[..3], &REFERENCE) {
            return Err(invalid());
        }

        let mut spec = ForeignKeySpec::new(text(&fields[0]), text(&fields[1]), text(&fields[2]));
        match &fields[3..] {
            [] => {}
            [delete] => {
                spec.on_delete = Some(delete.as_str().ok_or_else(invalid)?.to_string());
            }
            [delete, update] => {
                spec.on_delete = optional_text(delete).ok_or_else(invalid)?;
                spec.on_update = optional_text(update).ok_or_else(invalid)?;
            }
            _ => return Err(invalid()),
        }
        Ok(spec)
    }
}

fn text(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// `Some(None)` for `Null`, `Some(Some(text))` for text, `None` otherwise.
fn optional_text(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::Text(s) => Some(Some(s.clone())),
        _ => None,
    }
}

/// Column selection of a SELECT statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Columns {
    /// `*`, emitted as-is
    #[default]
    All,
    List(Vec<String>),
}

impl<S: Into<String>> FromIterator<S> for Columns {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Columns::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Options of a search (SELECT) query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchOptions {
    pub columns: Columns,
    pub count: bool,
    pub distinct: bool,
    pub condition: Option<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().collect();
        self
    }

    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Wraps text in single quotes, doubling any embedded quote.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn require_table(table: &str) -> Result<()> {
    if table.trim().is_empty() {
        return Err(DbControlError::Validation("table name must not be empty".to_string()));
    }
    Ok(())
}

fn require_finite<'a>(values: impl IntoIterator<Item = &'a Value>) -> Result<()> {
    match values.into_iter().find(|value| !value.is_finite()) {
        Some(value) => Err(DbControlError::Validation(format!(
            "{:?} has no SQL literal",
            value
        ))),
        None => Ok(()),
    }
}

fn require_unique<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column) {
            return Err(DbControlError::Validation(format!(
                "column `{}` is listed more than once",
                column
            )));
        }
    }
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS <table> (<columns>,<foreign keys>);`
///
/// With `auto_increment`, every `PRIMARY KEY` column gets `AUTO_INCREMENT`.
pub fn build_create_table(
    table: &str,
    columns: &[ColumnSpec],
    foreign_keys: &[ForeignKeySpec],
    auto_increment: bool,
) -> Result<String> {
    require_table(table)?;
    if columns.is_empty() {
        return Err(DbControlError::Validation(format!(
            "table `{}` needs at least one column",
            table
        )));
    }

    let mut definitions: Vec<String> = columns
        .iter()
        .map(|col| {
            let mut def = format!("{} {} {}", col.name, col.sql_type, col.nullability);
            if auto_increment && col.nullability == Nullability::PrimaryKey {
                def.push_str(" AUTO_INCREMENT");
            }
            def
        })
        .collect();
    definitions.extend(foreign_keys.iter().map(ForeignKeySpec::to_sql));

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        table,
        definitions.join(",")
    ))
}

/// `DROP TABLE IF EXISTS <table>;`
pub fn build_drop_table(table: &str) -> Result<String> {
    require_table(table)?;
    Ok(format!("DROP TABLE IF EXISTS {};", table))
}

/// `UPDATE <table> SET <assignments>[ WHERE <condition>];`
///
/// Without a condition every row of the table is updated.
pub fn build_update(
    table: &str,
    assignments: &OneOrMany<Assignment>,
    condition: Option<&str>,
) -> Result<String> {
    require_table(table)?;
    require_unique(assignments.as_slice().iter().map(|a| a.column.as_str()))?;
    require_finite(assignments.as_slice().iter().map(|a| &a.value))?;

    let mut sql = format!("UPDATE {} SET {}", table, to_assignment_string(assignments)?);
    if let Some(condition) = condition {
        sql.push_str(&format!(" WHERE {}", condition));
    }
    sql.push(';');
    Ok(sql)
}

/// `INSERT INTO <table> (<columns>) VALUES (<values>);`
///
/// A single column entry is used verbatim, so it may hold a preformatted
/// list such as `"a, b"`. Values are stringified, never quoted.
pub fn build_insert(
    table: &str,
    columns: &OneOrMany<String>,
    values: &OneOrMany<Value>,
) -> Result<String> {
    require_table(table)?;
    if columns.is_empty() || values.is_empty() {
        return Err(DbControlError::InvalidArgument(
            "insert needs at least one column and one value".to_string(),
        ));
    }
    if let (OneOrMany::Many(cols), OneOrMany::Many(vals)) = (columns, values) {
        if cols.len() != vals.len() {
            return Err(DbControlError::Validation(format!(
                "{} columns but {} values",
                cols.len(),
                vals.len()
            )));
        }
        require_unique(cols.iter().map(String::as_str))?;
    }
    require_finite(values.as_slice())?;

    let values: Vec<String> = values.as_slice().iter().map(Value::to_string).collect();
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        columns.as_slice().join(", "),
        values.join(", ")
    ))
}

/// `SELECT [COUNT(][DISTINCT ]<columns>[)] FROM <table>[ WHERE <condition>];`
pub fn build_select(table: &str, options: &SearchOptions) -> Result<String> {
    require_table(table)?;

    let columns = match &options.columns {
        Columns::All => "*".to_string(),
        Columns::List(list) if list.is_empty() => {
            return Err(DbControlError::Validation(
                "column list must not be empty; use Columns::All for `*`".to_string(),
            ))
        }
        Columns::List(list) => list.join(", "),
    };

    let mut sql = match (options.count, options.distinct) {
        (true, true) => format!("SELECT COUNT(DISTINCT {}) FROM {}", columns, table),
        (true, false) => format!("SELECT COUNT({}) FROM {}", columns, table),
        (false, true) => format!("SELECT DISTINCT {} FROM {}", columns, table),
        (false, false) => format!("SELECT {} FROM {}", columns, table),
    };
    if let Some(condition) = &options.condition {
        sql.push_str(&format!(" WHERE {}", condition));
    }
    sql.push(';');
    Ok(sql)
}

/// `DELETE FROM <table>[ WHERE <condition>];`
///
/// Exactly one of `condition` or `all` must be given.
pub fn build_delete(table: &str, condition: Option<&str>, all: bool) -> Result<String> {
    require_table(table)?;
    match (condition, all) {
        (None, true) => Ok(format!("DELETE FROM {};", table)),
        (Some(condition), false) => Ok(format!("DELETE FROM {} WHERE {};", table, condition)),
        _ => Err(DbControlError::Validation(
            "delete needs either a condition or `all`, not both and not neither".to_string(),
        )),
    }
}
