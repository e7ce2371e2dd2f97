use std::fmt;
use thiserror::Error;

/// Error state reported by a native client library at the moment a call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub code: i32,
    pub sqlstate: String,
    pub message: String,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQLSTATE [{}] [{}] {}", self.sqlstate, self.code, self.message)
    }
}

impl std::error::Error for DriverError {}

/// Which transaction boundary completed before the session mode could be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEnd {
    Commit,
    Rollback,
}

impl fmt::Display for TransactionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionEnd::Commit => f.write_str("commit"),
            TransactionEnd::Rollback => f.write_str("rollback"),
        }
    }
}

/// Represents errors that can occur in the UDBC module.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("General error: {0}")]
    General(String),
    #[error("Driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Connection error: {0}")]
    Connection(#[from] DriverError),
    /// The transaction already ended on the server; only switching back to
    /// autocommit failed.
    #[error("{after} succeeded but autocommit could not be restored: {source}")]
    AutocommitRestore {
        after: TransactionEnd,
        #[source]
        source: DriverError,
    },
    #[error("Query error: {0}")]
    Query(String),
    #[error("Value error: {0}")]
    Value(String),
    #[error("Invalid connection options: {0}")]
    InvalidOptions(String),
    #[error("Driver not registered: {0}")]
    DriverNotFound(String),
}

impl DbError {
    /// The native error state behind this error, if the vendor library reported one.
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            DbError::Connection(e) => Some(e),
            DbError::AutocommitRestore { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for DbError {
    fn from(e: tokio::task::JoinError) -> Self {
        DbError::Driver(Box::new(e))
    }
}
