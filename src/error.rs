//! Muninn error types

/// Muninn error types.
///
/// These cover the storage seams ([`TtlStore`](crate::TtlStore) and
/// [`OptionStore`](crate::OptionStore) implementations). Request-level
/// failures are never surfaced as `Err` — they travel as data inside
/// [`FetchOutcome`](crate::FetchOutcome), and store failures are swallowed
/// at the adapter boundary so a successful fetch is never converted into a
/// failed result.
#[derive(Debug, thiserror::Error)]
pub enum MuninnError {
    // Store errors
    #[error("store error: {0}")]
    Store(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Muninn operations
pub type Result<T> = std::result::Result<T, MuninnError>;
