//! Ordered playlist store
//!
//! Owns position assignment for the entries of one bound playlist. Every
//! structural operation reads the entry count, asks [`setlist_core::reorder`]
//! for a plan, and runs the plan's statements inside a single transaction.
//! If any statement fails, or a single-row statement does not hit exactly
//! one row, the whole transaction is rolled back and the error is returned:
//! a caller never sees a half-renumbered playlist.

use chrono::Utc;
use crate::playlists;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use setlist_core::reorder::{self, RenumberStep};
use setlist_core::{
    error::Result, Outcome, PlaylistEntry, PlaylistId, SetlistError, SkipReason, TrackId,
    TrackLocator, TrackResolver, ViewKey,
};
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Structural operations on one playlist at a time
pub struct OrderedPlaylistStore {
    pool: SqlitePool,
    resolver: Arc<dyn TrackResolver>,
    selection: Option<ViewKey>,
}

impl OrderedPlaylistStore {
    pub fn new(pool: SqlitePool, resolver: Arc<dyn TrackResolver>) -> Self {
        Self {
            pool,
            resolver,
            selection: None,
        }
    }

    /// Bind subsequent operations to a playlist
    ///
    /// Returns `false` when the playlist and filter mode are already bound,
    /// `true` when the binding changed and the view needs rebuilding.
    pub fn select(&mut self, playlist_id: PlaylistId, filter_soft_deleted: bool) -> bool {
        let key = ViewKey::new(playlist_id, filter_soft_deleted);
        if self.selection == Some(key) {
            debug!(playlist_id = %playlist_id, "already focused on playlist");
            return false;
        }
        self.selection = Some(key);
        true
    }

    pub fn selection(&self) -> Option<ViewKey> {
        self.selection
    }

    fn bound(&self) -> Result<PlaylistId> {
        self.selection
            .map(|key| key.playlist_id)
            .ok_or(SetlistError::NoPlaylistSelected)
    }

    /// Entries of the bound playlist in position order, soft-deleted tracks included
    pub async fn entries(&self) -> Result<Vec<PlaylistEntry>> {
        let playlist_id = self.bound()?;
        let rows = sqlx::query(
            r#"
            SELECT playlist_id, track_id, position, added_at
            FROM playlist_tracks
            WHERE playlist_id = ?
            ORDER BY position
            "#,
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PlaylistEntry {
                    playlist_id: row.get("playlist_id"),
                    track_id: row.get("track_id"),
                    position: row.get("position"),
                    added_at: crate::timestamp(row.get("added_at"))?,
                })
            })
            .collect()
    }

    /// Number of entries in the bound playlist
    pub async fn len(&self) -> Result<i64> {
        let playlist_id = self.bound()?;
        entry_count(&mut *self.pool.acquire().await?, playlist_id).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Insert one track so it lands on `target`
    ///
    /// `target` is clamped into `1..=N + 1`; non-positive values append.
    /// Returns the position the entry landed on.
    pub async fn insert_at(&self, locator: &TrackLocator, target: i64) -> Result<Outcome<i64>> {
        let playlist_id = self.bound()?;
        if self.rejects_changes(playlist_id).await? {
            return Ok(Outcome::Skipped(SkipReason::PlaylistLocked));
        }

        let track_id = match self.resolver.resolve(locator, true).await {
            Ok(id) => id,
            Err(err) if err.is_store_failure() => return Err(err),
            Err(err) => {
                debug!(playlist_id = %playlist_id, %locator, error = %err, "skipping insert");
                return Ok(Outcome::Skipped(SkipReason::UnresolvableTrack));
            }
        };

        let outcome = self.insert_block(playlist_id, &[track_id], target).await?;
        Ok(outcome.map(|(start, _)| start))
    }

    /// Insert a batch of tracks as one contiguous block starting at `target`
    ///
    /// Locators that fail to resolve are dropped; the rest keep their order.
    /// Returns how many entries were inserted.
    pub async fn insert_many(
        &self,
        locators: &[TrackLocator],
        target: i64,
    ) -> Result<Outcome<usize>> {
        let playlist_id = self.bound()?;
        if locators.is_empty() {
            return Ok(Outcome::Skipped(SkipReason::Unchanged));
        }
        if self.rejects_changes(playlist_id).await? {
            return Ok(Outcome::Skipped(SkipReason::PlaylistLocked));
        }

        let mut track_ids = Vec::with_capacity(locators.len());
        for (locator, resolved) in locators
            .iter()
            .zip(self.resolver.resolve_many(locators, true).await)
        {
            match resolved {
                Ok(id) => track_ids.push(id),
                Err(err) if err.is_store_failure() => return Err(err),
                Err(err) => {
                    debug!(playlist_id = %playlist_id, %locator, error = %err, "dropping from batch");
                }
            }
        }

        if track_ids.is_empty() {
            return Ok(Outcome::Skipped(SkipReason::UnresolvableTrack));
        }

        let outcome = self.insert_block(playlist_id, &track_ids, target).await?;
        Ok(outcome.map(|(_, count)| count))
    }

    /// Append one track after the last entry
    pub async fn append_track(&self, locator: &TrackLocator) -> Result<Outcome<i64>> {
        self.insert_at(locator, 0).await
    }

    /// Lock check ahead of track resolution, which may write to the library
    ///
    /// `begin_write` checks again inside the transaction.
    async fn rejects_changes(&self, playlist_id: PlaylistId) -> Result<bool> {
        let locked = playlists::is_locked(&self.pool, playlist_id).await?;
        if locked {
            debug!(playlist_id = %playlist_id, "playlist is locked, not resolving tracks");
        }
        Ok(locked)
    }

    async fn insert_block(
        &self,
        playlist_id: PlaylistId,
        track_ids: &[TrackId],
        target: i64,
    ) -> Result<Outcome<(i64, usize)>> {
        let Some(mut tx) = self.begin_write(playlist_id).await? else {
            return Ok(Outcome::Skipped(SkipReason::PlaylistLocked));
        };

        let result: Result<i64> = async {
            let len = entry_count(&mut *tx, playlist_id).await?;
            let (start, steps) = reorder::plan_insert(target, len, track_ids.len() as i64);
            apply_steps(&mut *tx, playlist_id, &steps).await?;

            let now = Utc::now().timestamp();
            for (offset, track_id) in track_ids.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO playlist_tracks (playlist_id, track_id, position, added_at)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(playlist_id)
                .bind(*track_id)
                .bind(start + offset as i64)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| SetlistError::store(format!("insert at {} failed: {}", start, e)))?;
            }
            Ok(start)
        }
        .await;

        let start = finish(tx, playlist_id, "insert", result).await?;
        info!(playlist_id = %playlist_id, position = start, count = track_ids.len(), "inserted tracks");
        Ok(Outcome::Applied((start, track_ids.len())))
    }

    /// Move the entry at `old_position` so it lands on `new_position`
    ///
    /// `new_position < 0` is ignored and `0` means "to the end".
    pub async fn move_track(&self, old_position: i64, new_position: i64) -> Result<Outcome<()>> {
        let playlist_id = self.bound()?;
        if new_position < 0 {
            return Ok(Outcome::Skipped(SkipReason::InvalidPosition));
        }

        self.run_plan(playlist_id, "move", |len| {
            reorder::plan_move(old_position, new_position, len)
        })
        .await
        .map(|outcome| {
            if outcome.is_applied() {
                info!(playlist_id = %playlist_id, from = old_position, to = new_position, "moved track");
            }
            outcome.map(|_| ())
        })
    }

    /// Remove the entries currently at `positions`
    ///
    /// Input order and duplicates don't matter. Returns how many entries were
    /// removed.
    pub async fn remove_many(&self, positions: &[i64]) -> Result<Outcome<usize>> {
        let playlist_id = self.bound()?;

        let outcome = self
            .run_plan(playlist_id, "remove", |len| {
                reorder::plan_removal(positions.iter().copied(), len)
            })
            .await?;

        Ok(outcome.map(|steps| {
            let removed = reorder::removed_count(&steps);
            info!(playlist_id = %playlist_id, removed, "removed tracks");
            removed
        }))
    }

    /// Remove the entry at `position`
    pub async fn remove_track(&self, position: i64) -> Result<Outcome<()>> {
        Ok(self.remove_many(&[position]).await?.map(|_| ()))
    }

    /// Randomly permute the entries from `start_position` to the end
    pub async fn shuffle_tracks(&self, start_position: i64) -> Result<Outcome<()>> {
        let mut rng = StdRng::from_entropy();
        self.shuffle_tracks_with_rng(start_position, &mut rng).await
    }

    /// [`shuffle_tracks`](Self::shuffle_tracks) with a caller-supplied random source
    pub async fn shuffle_tracks_with_rng<R: Rng + Send>(
        &self,
        start_position: i64,
        rng: &mut R,
    ) -> Result<Outcome<()>> {
        let playlist_id = self.bound()?;

        let outcome = self
            .run_plan(playlist_id, "shuffle", |len| {
                reorder::plan_shuffle(start_position, len, rng)
            })
            .await?;

        Ok(outcome.map(|steps| {
            info!(playlist_id = %playlist_id, from = start_position, swaps = steps.len() / 3, "shuffled tracks");
        }))
    }

    /// Plan against the current entry count and apply the plan, all in one transaction
    async fn run_plan<F>(
        &self,
        playlist_id: PlaylistId,
        op: &'static str,
        plan: F,
    ) -> Result<Outcome<Vec<RenumberStep>>>
    where
        F: FnOnce(i64) -> Outcome<Vec<RenumberStep>>,
    {
        let Some(mut tx) = self.begin_write(playlist_id).await? else {
            return Ok(Outcome::Skipped(SkipReason::PlaylistLocked));
        };

        let len = match entry_count(&mut *tx, playlist_id).await {
            Ok(len) => len,
            Err(err) => return finish(tx, playlist_id, op, Err(err)).await,
        };

        let steps = match plan(len) {
            Outcome::Applied(steps) => steps,
            Outcome::Skipped(reason) => {
                debug!(playlist_id = %playlist_id, op, %reason, "nothing to do");
                tx.rollback().await?;
                return Ok(Outcome::Skipped(reason));
            }
        };

        let result = apply_steps(&mut *tx, playlist_id, &steps).await;
        finish(tx, playlist_id, op, result).await?;
        Ok(Outcome::Applied(steps))
    }

    /// Open the write transaction for a structural change
    ///
    /// The first statement is a write, so SQLite's write lock is held before
    /// anything is read and two mutations of the same playlist can't
    /// interleave. Returns `None` (after rolling back) if the playlist is
    /// locked.
    async fn begin_write(
        &self,
        playlist_id: PlaylistId,
    ) -> Result<Option<Transaction<'static, Sqlite>>> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().timestamp())
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(SetlistError::PlaylistNotFound(playlist_id));
        }

        let locked: bool = sqlx::query_scalar("SELECT locked FROM playlists WHERE id = ?")
            .bind(playlist_id)
            .fetch_one(&mut *tx)
            .await?;
        if locked {
            debug!(playlist_id = %playlist_id, "playlist is locked, rejecting change");
            tx.rollback().await?;
            return Ok(None);
        }

        Ok(Some(tx))
    }
}

async fn entry_count(conn: &mut SqliteConnection, playlist_id: PlaylistId) -> Result<i64> {
    let len = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_tracks WHERE playlist_id = ?")
        .bind(playlist_id)
        .fetch_one(conn)
        .await?;
    Ok(len)
}

/// Commit on success, roll back and pass the error on otherwise
async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    playlist_id: PlaylistId,
    op: &'static str,
    result: Result<T>,
) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!(playlist_id = %playlist_id, op, error = %err, "rolling back");
            if let Err(rollback) = tx.rollback().await {
                warn!(playlist_id = %playlist_id, op, error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn apply_steps(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    steps: &[RenumberStep],
) -> Result<()> {
    for step in steps {
        apply_step(conn, playlist_id, *step).await?;
    }
    Ok(())
}

/// Run one planned step as one statement
async fn apply_step(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    step: RenumberStep,
) -> Result<()> {
    let result = match step {
        RenumberStep::Relocate { from, to } => {
            sqlx::query(
                "UPDATE playlist_tracks SET position = ? WHERE playlist_id = ? AND position = ?",
            )
            .bind(to)
            .bind(playlist_id)
            .bind(from)
            .execute(&mut *conn)
            .await
        }
        RenumberStep::Shift { from, to, delta } => {
            sqlx::query(
                r#"
                UPDATE playlist_tracks
                SET position = position + ?
                WHERE playlist_id = ?
                  AND position >= ?
                  AND (? IS NULL OR position <= ?)
                "#,
            )
            .bind(delta)
            .bind(playlist_id)
            .bind(from)
            .bind(to)
            .bind(to)
            .execute(&mut *conn)
            .await
        }
        RenumberStep::Remove { position } => {
            sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND position = ?")
                .bind(playlist_id)
                .bind(position)
                .execute(&mut *conn)
                .await
        }
    }
    .map_err(|e| SetlistError::store(format!("{:?} failed: {}", step, e)))?;

    // A single-row step that misses means the table no longer matches the plan
    let single_row = matches!(
        step,
        RenumberStep::Relocate { .. } | RenumberStep::Remove { .. }
    );
    if single_row && result.rows_affected() != 1 {
        return Err(SetlistError::store(format!(
            "{:?} affected {} rows, expected 1",
            step,
            result.rows_affected()
        )));
    }

    Ok(())
}
