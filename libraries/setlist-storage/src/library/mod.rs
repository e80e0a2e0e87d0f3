//! Library tracks and the track identity resolver
//!
//! The ordered store only deals in [`TrackId`]s. Turning a dropped file or a
//! known id into one happens here, with the library's add/undelete/dedup
//! policy:
//!
//! - a location already in the library resolves to its existing row;
//! - a soft-deleted track is brought back only when undelete is allowed;
//! - an unknown location is added if the file exists on disk.

use async_trait::async_trait;
use chrono::Utc;
use setlist_core::{error::Result, types::*, SetlistError, TrackResolver};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;

fn from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.get("id"),
        location: row.get("location"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        deleted: row.get::<i64, _>("deleted") != 0,
        added_at: crate::timestamp(row.get("added_at"))?,
    })
}

/// Get track by ID, soft-deleted or not
pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, location, title, artist, album, deleted, added_at FROM library WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Find track by exact location
pub async fn find_by_location(pool: &SqlitePool, location: &str) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, location, title, artist, album, deleted, added_at FROM library WHERE location = ?",
    )
    .bind(location)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Add a track to the library
///
/// Adding a location that is already known returns the existing track
/// unchanged.
pub async fn add_track(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    sqlx::query(
        r#"
        INSERT INTO library (location, title, artist, album, deleted, added_at)
        VALUES (?, ?, ?, ?, 0, ?)
        ON CONFLICT(location) DO NOTHING
        "#,
    )
    .bind(&track.location)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(Utc::now().timestamp())
    .execute(pool)
    .await?;

    find_by_location(pool, &track.location)
        .await?
        .ok_or_else(|| SetlistError::store("Failed to retrieve added track"))
}

/// Soft-delete or restore a track
///
/// Playlist entries pointing at the track are kept; filtered views hide them.
pub async fn set_deleted(pool: &SqlitePool, id: TrackId, deleted: bool) -> Result<()> {
    let result = sqlx::query("UPDATE library SET deleted = ? WHERE id = ?")
        .bind(deleted)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(SetlistError::TrackNotFound(id));
    }

    Ok(())
}

/// [`TrackResolver`] backed by the `library` table
#[derive(Debug, Clone)]
pub struct LibraryResolver {
    pool: SqlitePool,
}

impl LibraryResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn usable(&self, track: Track, allow_undelete: bool) -> Result<TrackId> {
        if !track.deleted {
            return Ok(track.id);
        }
        if !allow_undelete {
            return Err(SetlistError::unresolvable(format!(
                "{} is deleted",
                track.location
            )));
        }

        set_deleted(&self.pool, track.id, false).await?;
        tracing::debug!(track_id = %track.id, location = %track.location, "undeleted track");
        Ok(track.id)
    }

    async fn add_from_disk(&self, path: &Path) -> Result<TrackId> {
        // A missing file is an unresolvable track, not an I/O failure
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(SetlistError::unresolvable(path.display().to_string()));
        }

        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let track = add_track(
            &self.pool,
            CreateTrack {
                location: path.to_string_lossy().into_owned(),
                title,
                artist: None,
                album: None,
            },
        )
        .await?;

        tracing::debug!(track_id = %track.id, location = %track.location, "added track");
        Ok(track.id)
    }
}

#[async_trait]
impl TrackResolver for LibraryResolver {
    async fn resolve(&self, locator: &TrackLocator, allow_undelete: bool) -> Result<TrackId> {
        match locator {
            TrackLocator::Id(id) => {
                let track = get_by_id(&self.pool, *id)
                    .await?
                    .ok_or_else(|| SetlistError::unresolvable(locator.to_string()))?;
                self.usable(track, allow_undelete).await
            }
            TrackLocator::Path(path) => {
                let location = path.to_string_lossy();
                match find_by_location(&self.pool, &location).await? {
                    Some(track) => self.usable(track, allow_undelete).await,
                    None => self.add_from_disk(path).await,
                }
            }
        }
    }
}
