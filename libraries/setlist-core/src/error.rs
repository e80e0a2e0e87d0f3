/// Core error types for Setlist
use crate::types::{PlaylistId, TrackId};
use thiserror::Error;

/// Result type alias using `SetlistError`
pub type Result<T> = std::result::Result<T, SetlistError>;

/// Core error type for Setlist
#[derive(Error, Debug)]
pub enum SetlistError {
    /// Identity resolution produced no usable track
    #[error("Unresolvable track: {0}")]
    UnresolvableTrack(String),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Operation needs a bound playlist and none is selected
    #[error("No playlist selected")]
    NoPlaylistSelected,

    /// A statement inside a transaction failed; the transaction was rolled back
    #[error("Storage error: {0}")]
    Store(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SetlistError {
    /// Create a storage error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an unresolvable track error
    pub fn unresolvable(what: impl Into<String>) -> Self {
        Self::UnresolvableTrack(what.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error means the store could not guarantee its invariants
    ///
    /// These must always reach the caller; everything else is an expected
    /// edge case that callers usually turn into a no-op.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Database(_) | Self::Io(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for SetlistError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_classified() {
        assert!(SetlistError::store("disk full").is_store_failure());
        assert!(SetlistError::Database("locked".into()).is_store_failure());
        assert!(!SetlistError::unresolvable("/nope.mp3").is_store_failure());
        assert!(!SetlistError::NoPlaylistSelected.is_store_failure());
    }

    #[test]
    fn messages_name_the_subject() {
        let err = SetlistError::PlaylistNotFound(PlaylistId::new(42));
        assert_eq!(err.to_string(), "Playlist not found: 42");
    }
}
