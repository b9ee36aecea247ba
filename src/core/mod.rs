/// Core Module for dbcontrol
///
/// Shared infrastructure: the error model, the value model and the
/// database execution layer.

pub mod db;
pub mod error;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{DbControlError, ErrorKind, OutcomeExt, Result};
pub use value::{OneOrMany, Row, Value, ValueKind};
