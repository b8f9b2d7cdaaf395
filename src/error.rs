//! Error types for keywheel.

/// Result type alias for keywheel operations.
pub type Result<T> = std::result::Result<T, RotationError>;

/// Errors that can occur while rotating keys.
#[derive(Debug, thiserror::Error)]
pub enum RotationError {
    /// No configuration entries matched the requested prefix.
    #[error("No environment variables found with prefix '{0}'")]
    NoCandidates(String),

    /// The Database backend was selected but connection settings are incomplete.
    #[error("Missing database credentials: {0} is not set")]
    MissingCredentials(&'static str),

    /// Could not establish a database connection within the retry budget.
    #[error("Failed to connect to database after {attempts} attempts: {message}")]
    ConnectionFailure {
        /// Number of connection attempts made.
        attempts: u32,
        /// Description of the final attempt's failure.
        message: String,
    },

    /// A read or write against the remote store failed after connecting.
    #[error("Cursor store operation failed: {0}")]
    OperationFailure(#[from] mongodb::error::Error),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to serialize a cursor record.
    #[error("Failed to serialize cursor record: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic configuration error for other cases.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
