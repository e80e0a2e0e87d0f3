//! Subcommand implementations
//!
//! Every command opens its own [`PlaylistSession`], so each invocation of
//! the binary is one short-lived session against the shared database.

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use setlist_core::{
    Capability, CreatePlaylist, Outcome, Playlist, PlaylistId, SetlistError, Track, TrackId,
    TrackLocator, TrackResolver, ViewRow,
};
use setlist_storage::{library, playlists, LibraryResolver, PlaylistSession};
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Interpret a track argument: `#<id>` names a library track, anything else is a path
pub fn parse_locator(arg: &str) -> TrackLocator {
    arg.strip_prefix('#')
        .and_then(|id| id.parse::<i64>().ok())
        .map_or_else(
            || TrackLocator::Path(PathBuf::from(arg)),
            |id| TrackLocator::Id(TrackId::new(id)),
        )
}

pub struct App {
    pool: SqlitePool,
    show_all: bool,
}

impl App {
    /// Connect using `config` and bring the schema up to date
    pub async fn open(config: &CliConfig) -> Result<Self> {
        let pool =
            setlist_storage::open(&config.storage.database_url, config.pool_settings()).await?;
        Ok(Self::from_pool(pool, config.view.show_all))
    }

    pub fn from_pool(pool: SqlitePool, show_all: bool) -> Self {
        Self { pool, show_all }
    }

    fn resolver(&self) -> Arc<LibraryResolver> {
        Arc::new(LibraryResolver::new(self.pool.clone()))
    }

    /// Find a playlist by numeric id or exact name
    async fn playlist_id(&self, playlist: &str) -> Result<PlaylistId> {
        if let Ok(id) = playlist.parse::<i64>() {
            let id = PlaylistId::new(id);
            if playlists::get_by_id(&self.pool, id).await?.is_some() {
                return Ok(id);
            }
        }

        playlists::find_id_by_name(&self.pool, playlist)
            .await?
            .ok_or_else(|| CliError::UnknownPlaylist(playlist.to_string()))
    }

    async fn session(&self, playlist: &str) -> Result<PlaylistSession> {
        let id = self.playlist_id(playlist).await?;
        let mut session = PlaylistSession::new(self.pool.clone(), self.resolver(), self.show_all);
        session.select_playlist(id).await?;
        Ok(session)
    }

    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        if name.trim().is_empty() {
            return Err(SetlistError::invalid_input("playlist name is empty").into());
        }
        let playlist = playlists::create(&self.pool, CreatePlaylist::named(name)).await?;
        tracing::info!(playlist_id = %playlist.id, name, "created playlist");
        Ok(playlist)
    }

    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        Ok(playlists::get_all(&self.pool).await?)
    }

    pub async fn set_locked(&self, playlist: &str, locked: bool) -> Result<PlaylistId> {
        let id = self.playlist_id(playlist).await?;
        playlists::set_locked(&self.pool, id, locked).await?;
        tracing::info!(playlist_id = %id, locked, "changed lock");
        Ok(id)
    }

    /// Add a file to the library, or bring back its soft-deleted row
    pub async fn add_track(&self, path: &str) -> Result<Track> {
        let id = self.resolver().resolve(&parse_locator(path), true).await?;
        library::get_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| SetlistError::TrackNotFound(id).into())
    }

    /// Soft-delete a library track; playlist entries stay in place
    pub async fn delete_track(&self, id: i64) -> Result<()> {
        let id = TrackId::new(id);
        library::set_deleted(&self.pool, id, true).await?;
        tracing::info!(track_id = %id, "soft-deleted track");
        Ok(())
    }

    pub async fn list(&self, playlist: &str) -> Result<Vec<ViewRow>> {
        Ok(self.session(playlist).await?.rows())
    }

    pub async fn insert(
        &self,
        playlist: &str,
        position: i64,
        tracks: &[String],
    ) -> Result<Outcome<usize>> {
        let locators: Vec<TrackLocator> = tracks.iter().map(|t| parse_locator(t)).collect();
        let mut session = self.session(playlist).await?;
        Ok(session.insert_many(&locators, position).await?)
    }

    pub async fn append(&self, playlist: &str, track: &str) -> Result<Outcome<i64>> {
        let mut session = self.session(playlist).await?;
        Ok(session.append_track(&parse_locator(track)).await?)
    }

    pub async fn move_track(&self, playlist: &str, old: i64, new: i64) -> Result<Outcome<()>> {
        let mut session = self.session(playlist).await?;
        Ok(session.move_track(old, new).await?)
    }

    pub async fn remove(&self, playlist: &str, positions: &[i64]) -> Result<Outcome<usize>> {
        let mut session = self.session(playlist).await?;
        Ok(session.remove_many(positions).await?)
    }

    pub async fn shuffle(&self, playlist: &str, from: i64) -> Result<Outcome<()>> {
        let mut session = self.session(playlist).await?;
        Ok(session.shuffle_tracks(from).await?)
    }

    pub async fn search(&self, playlist: &str, text: &str) -> Result<Vec<ViewRow>> {
        let session = self.session(playlist).await?;
        session.search(text).await?;
        Ok(session.rows())
    }

    pub async fn capabilities(&self, playlist: &str) -> Result<BTreeSet<Capability>> {
        Ok(self.session(playlist).await?.capabilities().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_parsing() {
        assert_eq!(parse_locator("#12"), TrackLocator::Id(TrackId::new(12)));
        assert_eq!(
            parse_locator("/music/a.mp3"),
            TrackLocator::Path(PathBuf::from("/music/a.mp3"))
        );
        // Not a number after the marker: treat as a path
        assert_eq!(
            parse_locator("#hashtag.mp3"),
            TrackLocator::Path(PathBuf::from("#hashtag.mp3"))
        );
    }
}
