//! Playlist domain types

use super::ids::{PlaylistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the special auto-queue playlist.
///
/// Only used for capability reporting: tracks shown from the auto-queue itself
/// cannot be queued onto it again.
pub const AUTO_QUEUE_PLAYLIST_NAME: &str = "Auto DJ";

/// Playlist header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    /// Locked playlists reject every structural mutation
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub locked: bool,
}

impl CreatePlaylist {
    /// An unlocked playlist with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locked: false,
        }
    }
}

/// One ranked entry of a playlist
///
/// `position` is 1-based and dense: a playlist with N entries holds exactly
/// the positions `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub position: i64,
    pub added_at: DateTime<Utc>,
}
