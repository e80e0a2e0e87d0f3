/// Storage-specific errors
use thiserror::Error;

/// Storage error types
///
/// Covers setting the store up. Once a pool exists, operations report
/// `setlist_core::SetlistError` instead.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for setlist_core::SetlistError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(io) => setlist_core::SetlistError::Io(io),
            other => setlist_core::SetlistError::Database(other.to_string()),
        }
    }
}
