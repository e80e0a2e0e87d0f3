//! Read-side projection types

use super::ids::{PlaylistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one materialisation of the view: which playlist, which filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewKey {
    pub playlist_id: PlaylistId,
    pub exclude_soft_deleted: bool,
}

impl ViewKey {
    pub fn new(playlist_id: PlaylistId, exclude_soft_deleted: bool) -> Self {
        Self {
            playlist_id,
            exclude_soft_deleted,
        }
    }
}

/// Playlist entry joined with its library metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRow {
    pub track_id: TrackId,
    pub position: i64,
    pub added_at: DateTime<Utc>,

    /// Denormalized fields for display and search
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub location: String,
}
