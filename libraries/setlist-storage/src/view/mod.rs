//! View projection
//!
//! A materialised, position-sorted copy of one playlist's entries joined with
//! library metadata. The projection never writes: mutations go through
//! [`OrderedPlaylistStore`](crate::OrderedPlaylistStore) and the owner calls
//! [`ViewProjection::refresh`] afterwards.
//!
//! Handles are cheap to clone and share state, so a search can be issued
//! from another task while the owner keeps reading. Rebuilds, refreshes and
//! searches supersede each other: only the most recently issued request may
//! publish its rows.

use setlist_core::{error::Result, SetlistError, TrackId, ViewKey, ViewRow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct Snapshot {
    key: Option<ViewKey>,
    search: String,
    rows: Vec<ViewRow>,
    /// Key and search text of the newest request, published or not
    wanted_key: Option<ViewKey>,
    wanted_search: String,
    /// Generation of the newest request
    issued: u64,
}

#[derive(Debug)]
struct ViewState {
    pool: SqlitePool,
    snapshot: RwLock<Snapshot>,
    rebuilds: AtomicU64,
}

/// Shared handle to a playlist projection
#[derive(Debug, Clone)]
pub struct ViewProjection {
    inner: Arc<ViewState>,
}

/// A query that has been issued but not yet published
///
/// Obtained from [`ViewProjection::issue_search`]. Completing it publishes
/// its rows only if no other search, rebuild or refresh was issued since.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    key: ViewKey,
    text: String,
}

impl ViewProjection {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(ViewState {
                pool,
                snapshot: RwLock::new(Snapshot::default()),
                rebuilds: AtomicU64::new(0),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a request as the newest, superseding every earlier one
    fn issue(snapshot: &mut Snapshot, key: ViewKey, text: String) -> SearchTicket {
        snapshot.issued += 1;
        snapshot.wanted_key = Some(key);
        snapshot.wanted_search.clone_from(&text);
        SearchTicket {
            generation: snapshot.issued,
            key,
            text,
        }
    }

    /// Query a ticket's rows and publish them if it is still the newest request
    ///
    /// Returns the published row count, or `None` if superseded.
    async fn run(&self, ticket: SearchTicket) -> Result<Option<usize>> {
        let rows = fetch_rows(&self.inner.pool, ticket.key, &ticket.text).await?;

        // Checked under the write lock: a newer request can't publish in between
        let mut snapshot = self.write();
        if snapshot.issued != ticket.generation {
            debug!(
                playlist_id = %ticket.key.playlist_id,
                text = %ticket.text,
                generation = ticket.generation,
                latest = snapshot.issued,
                "superseded, dropping rows"
            );
            return Ok(None);
        }

        let count = rows.len();
        snapshot.key = Some(ticket.key);
        snapshot.search = ticket.text;
        snapshot.rows = rows;
        Ok(Some(count))
    }

    /// Materialise the projection for `key`
    ///
    /// Returns `false` without touching the store when `key` is already the
    /// current projection, and `false` when a newer request overtook this
    /// one. A new key clears any active search.
    pub async fn rebuild(&self, key: ViewKey) -> Result<bool> {
        let ticket = {
            let mut snapshot = self.write();
            if snapshot.key == Some(key) && snapshot.wanted_key == Some(key) {
                return Ok(false);
            }
            Self::issue(&mut snapshot, key, String::new())
        };

        let Some(rows) = self.run(ticket).await? else {
            return Ok(false);
        };
        debug!(playlist_id = %key.playlist_id, rows, "rebuilt view");
        self.inner.rebuilds.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    /// Re-query the newest requested key and search text
    ///
    /// Does nothing if no playlist has been projected yet. A search issued
    /// before the refresh is folded into it.
    pub async fn refresh(&self) -> Result<()> {
        let ticket = {
            let mut snapshot = self.write();
            let Some(key) = snapshot.wanted_key else {
                return Ok(());
            };
            let text = snapshot.wanted_search.clone();
            Self::issue(&mut snapshot, key, text)
        };

        if self.run(ticket).await?.is_some() {
            self.inner.rebuilds.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    /// How many times rows were materialised from the store
    pub fn rebuild_count(&self) -> u64 {
        self.inner.rebuilds.load(Ordering::SeqCst)
    }

    /// Filter the projection by a case-insensitive substring
    ///
    /// Matches title, artist, album and location. Empty text clears the
    /// filter. Returns the new row count, or `None` if a newer search,
    /// rebuild or refresh was issued while this one was running.
    pub async fn search(&self, text: &str) -> Result<Option<usize>> {
        let ticket = self.issue_search(text)?;
        self.complete_search(ticket).await
    }

    /// Take a ticket for a search on the newest requested key
    ///
    /// Issuing a ticket supersedes every request issued before it.
    pub fn issue_search(&self, text: &str) -> Result<SearchTicket> {
        let mut snapshot = self.write();
        let key = snapshot.wanted_key.ok_or(SetlistError::NoPlaylistSelected)?;
        Ok(Self::issue(&mut snapshot, key, text.trim().to_string()))
    }

    /// Run a ticket's query and publish the rows if it is still the latest
    pub async fn complete_search(&self, ticket: SearchTicket) -> Result<Option<usize>> {
        self.run(ticket).await
    }

    pub fn key(&self) -> Option<ViewKey> {
        self.read().key
    }

    pub fn search_text(&self) -> String {
        self.read().search.clone()
    }

    pub fn row_count(&self) -> usize {
        self.read().rows.len()
    }

    /// Playlist position shown on a 0-based view row
    pub fn position_of(&self, row: usize) -> Option<i64> {
        self.read().rows.get(row).map(|r| r.position)
    }

    pub fn track_at(&self, row: usize) -> Option<TrackId> {
        self.read().rows.get(row).map(|r| r.track_id)
    }

    pub fn row(&self, row: usize) -> Option<ViewRow> {
        self.read().rows.get(row).cloned()
    }

    pub fn rows(&self) -> Vec<ViewRow> {
        self.read().rows.clone()
    }
}

/// Escape LIKE wildcards so user text matches literally
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn from_row(row: &SqliteRow) -> Result<ViewRow> {
    Ok(ViewRow {
        track_id: row.get("track_id"),
        position: row.get("position"),
        added_at: crate::timestamp(row.get("added_at"))?,
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        location: row.get("location"),
    })
}

async fn fetch_rows(pool: &SqlitePool, key: ViewKey, text: &str) -> Result<Vec<ViewRow>> {
    let mut sql = String::from(
        r#"
        SELECT pt.track_id, pt.position, pt.added_at,
               l.title, l.artist, l.album, l.location
        FROM playlist_tracks pt
        JOIN library l ON l.id = pt.track_id
        WHERE pt.playlist_id = ?1
        "#,
    );
    if key.exclude_soft_deleted {
        sql.push_str(" AND l.deleted = 0");
    }
    if !text.is_empty() {
        sql.push_str(
            r#" AND (l.title LIKE ?2 ESCAPE '\'
                  OR l.artist LIKE ?2 ESCAPE '\'
                  OR l.album LIKE ?2 ESCAPE '\'
                  OR l.location LIKE ?2 ESCAPE '\')"#,
        );
    }
    sql.push_str(" ORDER BY pt.position");

    let mut query = sqlx::query(&sql).bind(key.playlist_id);
    if !text.is_empty() {
        query = query.bind(like_pattern(text));
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }
}
