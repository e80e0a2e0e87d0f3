/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Playlist not found: {0}")]
    UnknownPlaylist(String),

    #[error(transparent)]
    Setlist(#[from] setlist_core::SetlistError),
}

impl From<setlist_storage::StorageError> for CliError {
    fn from(err: setlist_storage::StorageError) -> Self {
        // Convert StorageError -> SetlistError -> CliError
        CliError::Setlist(err.into())
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
