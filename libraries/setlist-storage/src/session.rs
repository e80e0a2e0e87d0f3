//! Playlist session
//!
//! Holds the selected playlist, the store bound to it and its projection.
//! Mutations that apply refresh the projection before returning, so reads
//! through the session always reflect the last committed change.

use crate::{playlists, OrderedPlaylistStore, ViewProjection};
use rand::Rng;
use setlist_core::{
    capabilities, error::Result, Capability, Outcome, PlaylistEntry, PlaylistId, SetlistError,
    TrackId, TrackLocator, TrackResolver, ViewKey, ViewRow,
};
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct PlaylistSession {
    pool: SqlitePool,
    store: OrderedPlaylistStore,
    view: ViewProjection,
    show_all: bool,
}

impl PlaylistSession {
    /// `show_all` keeps soft-deleted tracks in the projection
    pub fn new(pool: SqlitePool, resolver: Arc<dyn TrackResolver>, show_all: bool) -> Self {
        Self {
            store: OrderedPlaylistStore::new(pool.clone(), resolver),
            view: ViewProjection::new(pool.clone()),
            pool,
            show_all,
        }
    }

    /// Focus the session on a playlist
    ///
    /// Selecting the playlist that is already focused does not re-query.
    /// Returns whether the projection was rebuilt.
    pub async fn select_playlist(&mut self, playlist_id: PlaylistId) -> Result<bool> {
        if playlists::get_by_id(&self.pool, playlist_id).await?.is_none() {
            return Err(SetlistError::PlaylistNotFound(playlist_id));
        }

        let exclude_soft_deleted = !self.show_all;
        self.store.select(playlist_id, exclude_soft_deleted);
        self.view
            .rebuild(ViewKey::new(playlist_id, exclude_soft_deleted))
            .await
    }

    pub fn selected(&self) -> Option<PlaylistId> {
        self.store.selection().map(|key| key.playlist_id)
    }

    async fn refreshed<T>(&self, outcome: Outcome<T>) -> Result<Outcome<T>> {
        if outcome.is_applied() {
            self.view.refresh().await?;
        }
        Ok(outcome)
    }

    pub async fn insert_at(&mut self, locator: &TrackLocator, target: i64) -> Result<Outcome<i64>> {
        let outcome = self.store.insert_at(locator, target).await?;
        self.refreshed(outcome).await
    }

    pub async fn insert_many(
        &mut self,
        locators: &[TrackLocator],
        target: i64,
    ) -> Result<Outcome<usize>> {
        let outcome = self.store.insert_many(locators, target).await?;
        self.refreshed(outcome).await
    }

    pub async fn append_track(&mut self, locator: &TrackLocator) -> Result<Outcome<i64>> {
        let outcome = self.store.append_track(locator).await?;
        self.refreshed(outcome).await
    }

    pub async fn move_track(&mut self, old_position: i64, new_position: i64) -> Result<Outcome<()>> {
        let outcome = self.store.move_track(old_position, new_position).await?;
        self.refreshed(outcome).await
    }

    pub async fn remove_many(&mut self, positions: &[i64]) -> Result<Outcome<usize>> {
        let outcome = self.store.remove_many(positions).await?;
        self.refreshed(outcome).await
    }

    pub async fn remove_track(&mut self, position: i64) -> Result<Outcome<()>> {
        let outcome = self.store.remove_track(position).await?;
        self.refreshed(outcome).await
    }

    pub async fn shuffle_tracks(&mut self, start_position: i64) -> Result<Outcome<()>> {
        let outcome = self.store.shuffle_tracks(start_position).await?;
        self.refreshed(outcome).await
    }

    pub async fn shuffle_tracks_with_rng<R: Rng + Send>(
        &mut self,
        start_position: i64,
        rng: &mut R,
    ) -> Result<Outcome<()>> {
        let outcome = self
            .store
            .shuffle_tracks_with_rng(start_position, rng)
            .await?;
        self.refreshed(outcome).await
    }

    /// Filter the projection; see [`ViewProjection::search`]
    pub async fn search(&self, text: &str) -> Result<Option<usize>> {
        self.view.search(text).await
    }

    /// Another handle on this session's projection
    pub fn view(&self) -> ViewProjection {
        self.view.clone()
    }

    pub fn store(&self) -> &OrderedPlaylistStore {
        &self.store
    }

    /// Unfiltered entries of the selected playlist
    pub async fn entries(&self) -> Result<Vec<PlaylistEntry>> {
        self.store.entries().await
    }

    pub fn row_count(&self) -> usize {
        self.view.row_count()
    }

    pub fn position_of(&self, row: usize) -> Option<i64> {
        self.view.position_of(row)
    }

    pub fn track_at(&self, row: usize) -> Option<TrackId> {
        self.view.track_at(row)
    }

    pub fn rows(&self) -> Vec<ViewRow> {
        self.view.rows()
    }

    /// What a UI may offer for the selected playlist
    pub async fn capabilities(&self) -> Result<BTreeSet<Capability>> {
        let playlist_id = self.selected().ok_or(SetlistError::NoPlaylistSelected)?;
        let playlist = playlists::get_by_id(&self.pool, playlist_id)
            .await?
            .ok_or(SetlistError::PlaylistNotFound(playlist_id))?;
        let is_auto_queue = playlists::is_auto_queue(&self.pool, playlist_id).await?;

        Ok(capabilities(&playlist, is_auto_queue))
    }
}
