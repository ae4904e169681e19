use thiserror::Error;

/// Errors surfaced by the message pipeline and query services.
///
/// Validation, conflict, and not-found are expected outcomes expressed as
/// typed values; only `Storage` represents an unexpected fault, and its
/// display text never leaks store internals beyond the wrapped summary.
#[derive(Debug, Error)]
pub enum MessageError {
    /// One or more structural or field-level violations, accumulated.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The message identifier is already taken.
    #[error("message with id '{0}' already exists")]
    Conflict(String),

    #[error("message not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

impl MessageError {
    /// Single-violation convenience constructor.
    pub fn validation(violation: impl Into<String>) -> Self {
        MessageError::Validation(vec![violation.into()])
    }

    /// All violations carried by this error (empty for non-validation cases).
    pub fn violations(&self) -> &[String] {
        match self {
            MessageError::Validation(violations) => violations,
            _ => &[],
        }
    }
}

/// Errors from repository operations (used by trait definitions in palaver-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
