use thiserror::Error;

/// Error type for myrs operations
#[derive(Debug, Error)]
pub enum MyRsError {
    /// Statement-level rule broken before anything reached the driver:
    /// missing table, empty payload, mismatched insert columns, HAVING
    /// without GROUP BY, UPDATE/DELETE without WHERE, negative limit/offset.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A table, column, or alias name failed the identifier grammar.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// No usable database driver could be resolved at construction.
    #[error("No usable database driver: {0}")]
    DriverUnavailable(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A fetched value could not be read as the requested type.
    #[error("Cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl MyRsError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        MyRsError::Validation(message.into())
    }

    pub(crate) fn invalid_identifier(name: impl Into<String>) -> Self {
        MyRsError::InvalidIdentifier(name.into())
    }
}

/// Result type alias for myrs operations
pub type Result<T> = std::result::Result<T, MyRsError>;
