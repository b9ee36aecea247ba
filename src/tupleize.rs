//! Column/value pairs rendered as `col = val` assignment lists.

use crate::core::value::{OneOrMany, Value};
use crate::core::{DbControlError, Result};

/// A `(column, value)` pair used by UPDATE statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Assignment {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl<C: Into<String>, V: Into<Value>> From<(C, V)> for Assignment {
    fn from((column, value): (C, V)) -> Self {
        Assignment::new(column, value)
    }
}

/// Renders assignments as `"col1 = val1,col2 = val2"`.
///
/// Values are stringified, never quoted. An empty sequence is rejected with
/// `InvalidArgument`.
pub fn to_assignment_string(pairs: &OneOrMany<Assignment>) -> Result<String> {
    if pairs.is_empty() {
        return Err(DbControlError::InvalidArgument(
            "at least one column/value assignment is required".to_string(),
        ));
    }

    Ok(pairs
        .as_slice()
        .iter()
        .map(|pair| format!("{} = {}", pair.column, pair.value))
        .collect::<Vec<_>>()
        .join(","))
}
