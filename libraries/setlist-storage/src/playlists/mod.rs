use chrono::Utc;
use setlist_core::{error::Result, types::*, SetlistError};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.get("id"),
        name: row.get("name"),
        locked: row.get::<i64, _>("locked") != 0,
        created_at: crate::timestamp(row.get("created_at"))?,
        updated_at: crate::timestamp(row.get("updated_at"))?,
    })
}

/// Get all playlists, ordered by name
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, locked, created_at, updated_at
        FROM playlists
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, locked, created_at, updated_at
        FROM playlists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Look a playlist up by its exact name
pub async fn find_id_by_name(pool: &SqlitePool, name: &str) -> Result<Option<PlaylistId>> {
    let id = sqlx::query_scalar("SELECT id FROM playlists WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let now = Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO playlists (name, locked, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&playlist.name)
    .bind(playlist.locked)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = PlaylistId::new(result.last_insert_rowid());

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| SetlistError::store("Failed to retrieve created playlist"))
}

/// Lock or unlock a playlist against structural changes
pub async fn set_locked(pool: &SqlitePool, id: PlaylistId, locked: bool) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET locked = ?, updated_at = ? WHERE id = ?")
        .bind(locked)
        .bind(Utc::now().timestamp())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(SetlistError::PlaylistNotFound(id));
    }

    Ok(())
}

/// Whether a playlist currently rejects structural changes
pub async fn is_locked(pool: &SqlitePool, id: PlaylistId) -> Result<bool> {
    let locked: Option<bool> = sqlx::query_scalar("SELECT locked FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    locked.ok_or(SetlistError::PlaylistNotFound(id))
}

/// Whether `id` is the auto-queue playlist
pub async fn is_auto_queue(pool: &SqlitePool, id: PlaylistId) -> Result<bool> {
    let auto_queue = find_id_by_name(pool, AUTO_QUEUE_PLAYLIST_NAME).await?;
    Ok(auto_queue == Some(id))
}
