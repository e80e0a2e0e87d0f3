//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so WAL mode, foreign keys and transactions behave as in production.

use setlist_core::{PlaylistId, TrackId, TrackResolver};
use setlist_storage::{LibraryResolver, OrderedPlaylistStore, PlaylistSession};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = setlist_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        // Run migrations
        setlist_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self { pool, temp_dir }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Scratch directory for files that should exist on disk
    pub fn dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    pub fn resolver(&self) -> Arc<dyn TrackResolver> {
        Arc::new(LibraryResolver::new(self.pool.clone()))
    }

    /// Store bound to `playlist_id`, soft-deleted tracks filtered
    pub fn store_for(&self, playlist_id: PlaylistId) -> OrderedPlaylistStore {
        let mut store = OrderedPlaylistStore::new(self.pool.clone(), self.resolver());
        store.select(playlist_id, true);
        store
    }

    pub fn session(&self, show_all: bool) -> PlaylistSession {
        PlaylistSession::new(self.pool.clone(), self.resolver(), show_all)
    }
}

/// Test fixture: Create a playlist
pub async fn create_test_playlist(pool: &SqlitePool, name: &str, locked: bool) -> PlaylistId {
    let result = sqlx::query(
        "INSERT INTO playlists (name, locked, created_at, updated_at) VALUES (?, ?, 0, 0)",
    )
    .bind(name)
    .bind(locked)
    .execute(pool)
    .await
    .expect("Failed to create test playlist");

    PlaylistId::new(result.last_insert_rowid())
}

/// Test fixture: Create a library track
pub async fn create_test_track(pool: &SqlitePool, title: &str, artist: Option<&str>) -> TrackId {
    let result = sqlx::query(
        "INSERT INTO library (location, title, artist, album, deleted, added_at)
         VALUES (?, ?, ?, NULL, 0, 0)",
    )
    .bind(format!("/music/{}.mp3", title))
    .bind(title)
    .bind(artist)
    .execute(pool)
    .await
    .expect("Failed to create test track");

    TrackId::new(result.last_insert_rowid())
}

/// Test fixture: Flag a track as soft-deleted
pub async fn soft_delete(pool: &SqlitePool, track_id: TrackId) {
    sqlx::query("UPDATE library SET deleted = 1 WHERE id = ?")
        .bind(track_id)
        .execute(pool)
        .await
        .expect("Failed to soft-delete track");
}

/// Test fixture: Put `track_id` at `position` without going through the store
pub async fn add_entry(pool: &SqlitePool, playlist_id: PlaylistId, track_id: TrackId, position: i64) {
    sqlx::query(
        "INSERT INTO playlist_tracks (playlist_id, track_id, position, added_at) VALUES (?, ?, ?, 0)",
    )
    .bind(playlist_id)
    .bind(track_id)
    .bind(position)
    .execute(pool)
    .await
    .expect("Failed to add playlist entry");
}

/// Test fixture: A playlist holding `count` fresh tracks at positions `1..=count`
///
/// Returns the playlist and its tracks in position order.
pub async fn create_filled_playlist(
    pool: &SqlitePool,
    name: &str,
    count: usize,
) -> (PlaylistId, Vec<TrackId>) {
    let playlist_id = create_test_playlist(pool, name, false).await;
    let mut tracks = Vec::with_capacity(count);
    for i in 1..=count {
        let track_id = create_test_track(pool, &format!("{} {}", name, i), None).await;
        add_entry(pool, playlist_id, track_id, i as i64).await;
        tracks.push(track_id);
    }
    (playlist_id, tracks)
}

/// Track ids in position order, straight from the table
pub async fn track_order(pool: &SqlitePool, playlist_id: PlaylistId) -> Vec<TrackId> {
    sqlx::query_scalar("SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position")
        .bind(playlist_id)
        .fetch_all(pool)
        .await
        .expect("Failed to read track order")
}

/// Positions in ascending order, straight from the table
pub async fn positions(pool: &SqlitePool, playlist_id: PlaylistId) -> Vec<i64> {
    sqlx::query_scalar("SELECT position FROM playlist_tracks WHERE playlist_id = ? ORDER BY position")
        .bind(playlist_id)
        .fetch_all(pool)
        .await
        .expect("Failed to read positions")
}

/// Assert positions are exactly `1..=N`
pub async fn assert_dense(pool: &SqlitePool, playlist_id: PlaylistId) {
    let positions = positions(pool, playlist_id).await;
    let expected: Vec<i64> = (1..=positions.len() as i64).collect();
    assert_eq!(positions, expected, "positions are not dense");
}

/// Pick tracks out of `tracks` by 1-based index
pub fn pick(tracks: &[TrackId], indexes: &[usize]) -> Vec<TrackId> {
    indexes.iter().map(|i| tracks[i - 1]).collect()
}
