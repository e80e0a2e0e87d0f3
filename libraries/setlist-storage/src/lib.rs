//! Setlist Storage
//!
//! `SQLite` persistence layer for Setlist: an ordered playlist store whose
//! entries carry dense 1-based positions that stay a contiguous permutation
//! after every mutation.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//!   (`playlists`, `library`, `ordered`, `view`)
//! - **One Transaction Per Mutation**: structural changes either commit as a
//!   whole or roll back as a whole
//! - **Explicit Session**: the selected playlist lives in a [`PlaylistSession`],
//!   not in ambient state
//!
//! # Example
//!
//! ```rust,no_run
//! use setlist_storage::{open, LibraryResolver, PlaylistSession, PoolSettings};
//! use setlist_core::PlaylistId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = open("sqlite://setlist.db", PoolSettings::default()).await?;
//!
//! let resolver = Arc::new(LibraryResolver::new(pool.clone()));
//! let mut session = PlaylistSession::new(pool, resolver, false);
//!
//! session.select_playlist(PlaylistId::new(1)).await?;
//! session.move_track(4, 2).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod session;

// Vertical slices
pub mod library;
pub mod ordered;
pub mod playlists;
pub mod view;

pub use error::StorageError;
pub use library::LibraryResolver;
pub use ordered::OrderedPlaylistStore;
pub use session::PlaylistSession;
pub use view::ViewProjection;

use chrono::{DateTime, Utc};
use setlist_core::SetlistError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection pool knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long a connection waits on SQLite's write lock before failing
    pub busy_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool with default settings
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://setlist.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with(database_url, PoolSettings::default()).await
}

/// Create a new `SQLite` pool
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed or the connection fails
pub async fn create_pool_with(
    database_url: &str,
    settings: PoolSettings,
) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = database_url, ?settings, "creating pool");

    // WAL keeps readers off uncommitted pages while a mutation is in flight
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(settings.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await?;

    tracing::debug!("pool created");

    Ok(pool)
}

/// Create a pool and bring its schema up to date
///
/// # Errors
///
/// Returns `StorageError::Database` if the connection fails and
/// `StorageError::Migration` if the schema cannot be migrated
pub async fn open(database_url: &str, settings: PoolSettings) -> Result<SqlitePool, StorageError> {
    let pool = create_pool_with(database_url, settings).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Decode a stored unix timestamp
pub(crate) fn timestamp(secs: i64) -> setlist_core::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| SetlistError::store(format!("Invalid timestamp: {}", secs)))
}
