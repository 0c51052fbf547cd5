//! Error types for the FlexiMart catalog

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Unified error type for all catalog operations
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique index violation (server code 11000)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Server selection or operation timeout - retryable
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Transient error that may succeed on retry
    #[error("Transient error: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Returns true if this error is potentially retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::Timeout(_) | CatalogError::Transient(_)
        )
    }

    /// Returns true if this is a unique-constraint violation
    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Conflict(_))
    }
}

/// Server error code for duplicate key violations
const DUPLICATE_KEY_CODE: i32 = 11000;

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        match &*err.kind {
            ErrorKind::Write(WriteFailure::WriteError(write_err))
                if write_err.code == DUPLICATE_KEY_CODE =>
            {
                CatalogError::Conflict(err.to_string())
            }
            ErrorKind::InsertMany(insert_err) => {
                let duplicate = insert_err
                    .write_errors
                    .as_ref()
                    .is_some_and(|errs| errs.iter().any(|e| e.code == DUPLICATE_KEY_CODE));
                if duplicate {
                    CatalogError::Conflict(err.to_string())
                } else {
                    CatalogError::Database(err.to_string())
                }
            }
            ErrorKind::ServerSelection { .. } => CatalogError::Timeout(err.to_string()),
            ErrorKind::ConnectionPoolCleared { .. } => CatalogError::Transient(err.to_string()),
            ErrorKind::Io(_) => CatalogError::Connection(err.to_string()),
            ErrorKind::Authentication { .. } => CatalogError::Connection(err.to_string()),
            ErrorKind::InvalidArgument { .. } => CatalogError::Query(err.to_string()),
            ErrorKind::BsonSerialization(_) => CatalogError::Serialization(err.to_string()),
            ErrorKind::BsonDeserialization(_) => CatalogError::Deserialization(err.to_string()),
            _ => CatalogError::Database(err.to_string()),
        }
    }
}

impl From<bson::ser::Error> for CatalogError {
    fn from(err: bson::ser::Error) -> Self {
        CatalogError::Serialization(format!("BSON serialization error: {}", err))
    }
}

impl From<bson::de::Error> for CatalogError {
    fn from(err: bson::de::Error) -> Self {
        CatalogError::Deserialization(format!("BSON deserialization error: {}", err))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}
