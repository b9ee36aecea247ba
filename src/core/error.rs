/// dbcontrol Error Module
///
/// This module defines the error types for dbcontrol. Every operation returns
/// `Result<T>`; nothing is swallowed at the library boundary, and callers that
/// prefer the boolean outcome style can use [`OutcomeExt`].
use thiserror::Error;

/// Errors raised by a database driver behind the `Connection` traits.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Errors from the bundled SQLite driver
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Errors from any other driver implementation
    #[error("{0}")]
    Other(String),
}

/// Result type used by driver implementations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Comprehensive error type for dbcontrol.
#[derive(Error, Debug)]
pub enum DbControlError {
    /// Malformed DSN or configuration file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Structured input rejected before any SQL was built
    #[error("Validation error: {0}")]
    Validation(String),

    /// An input that must hold at least one element was empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The database could not be reached
    #[error("Connection error ({target}): {source}")]
    Connection {
        target: String,
        #[source]
        source: DriverError,
    },

    /// The database rejected the statement
    #[error("Execution error in `{statement}`: {source}")]
    Execution {
        statement: String,
        #[source]
        source: DriverError,
    },

    /// A statement succeeded but its result had an unexpected shape
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse error categories, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Validation,
    Connection,
    Execution,
}

impl DbControlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbControlError::Config(_) | DbControlError::Io(_) | DbControlError::Toml(_) => {
                ErrorKind::Config
            }
            DbControlError::Validation(_) | DbControlError::InvalidArgument(_) => {
                ErrorKind::Validation
            }
            DbControlError::Connection { .. } => ErrorKind::Connection,
            DbControlError::Execution { .. } | DbControlError::UnexpectedResult(_) => {
                ErrorKind::Execution
            }
        }
    }
}

/// Type alias for Result to use DbControlError as the error type.
pub type Result<T> = std::result::Result<T, DbControlError>;

/// Converts a `Result` into the `(succeeded, result)` outcome pair.
///
/// The error itself is dropped; it has already been logged where it was raised.
pub trait OutcomeExt<T> {
    fn into_outcome(self) -> (bool, Option<T>);
}

impl<T> OutcomeExt<T> for Result<T> {
    fn into_outcome(self) -> (bool, Option<T>) {
        match self {
            Ok(value) => (true, Some(value)),
            Err(_) => (false, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let exec_err = DbControlError::Execution {
            statement: "SELEC 1;".to_string(),
            source: DriverError::Other("syntax error".to_string()),
        };
        let msg = exec_err.to_string();
        assert!(msg.contains("Execution error"));
        assert!(msg.contains("SELEC 1;"));
        assert!(msg.contains("syntax error"));

        let config_err = DbControlError::Config("missing port".to_string());
        assert!(config_err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DbControlError = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Config);

        let driver_err: DriverError = rusqlite::Error::ExecuteReturnedResults.into();
        assert!(matches!(driver_err, DriverError::Sqlite(_)));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            DbControlError::InvalidArgument("empty".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            DbControlError::Connection {
                target: "localhost".into(),
                source: DriverError::Other("refused".into()),
            }
            .kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            DbControlError::UnexpectedResult("no rows".into()).kind(),
            ErrorKind::Execution
        );
    }

    #[test]
    fn test_into_outcome() {
        let ok: Result<i64> = Ok(3);
        assert_eq!(ok.into_outcome(), (true, Some(3)));

        let failed: Result<i64> = Err(DbControlError::Validation("bad".into()));
        assert_eq!(failed.into_outcome(), (false, None));
    }
}
