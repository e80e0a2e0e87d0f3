//! What a caller may do with the currently shown playlist

use super::playlist::Playlist;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single capability flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ReceiveDrops,
    Reorder,
    AddToCrate,
    AddToPlaylist,
    AddToAutoQueue,
    ReloadMetadata,
    LoadToDeck,
    LoadToSampler,
    Remove,
    BpmLock,
    ClearBeats,
    ResetPlayed,
    Locked,
}

const BASE_CAPABILITIES: [Capability; 11] = [
    Capability::ReceiveDrops,
    Capability::Reorder,
    Capability::AddToCrate,
    Capability::AddToPlaylist,
    Capability::ReloadMetadata,
    Capability::LoadToDeck,
    Capability::LoadToSampler,
    Capability::Remove,
    Capability::BpmLock,
    Capability::ClearBeats,
    Capability::ResetPlayed,
];

/// Compute the capability set for a playlist
///
/// Computed on demand; nothing here is cached.
pub fn capabilities(playlist: &Playlist, is_auto_queue: bool) -> BTreeSet<Capability> {
    let mut caps: BTreeSet<Capability> = BASE_CAPABILITIES.into_iter().collect();

    // Tracks already in the auto-queue can't be queued onto it again
    if !is_auto_queue {
        caps.insert(Capability::AddToAutoQueue);
    }

    if playlist.locked {
        caps.insert(Capability::Locked);
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaylistId;
    use chrono::Utc;

    fn playlist(locked: bool) -> Playlist {
        Playlist {
            id: PlaylistId::new(1),
            name: "Warmup".to_string(),
            locked,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn regular_playlist_can_feed_auto_queue() {
        let caps = capabilities(&playlist(false), false);
        assert!(caps.contains(&Capability::AddToAutoQueue));
        assert!(caps.contains(&Capability::Reorder));
        assert!(!caps.contains(&Capability::Locked));
        assert_eq!(caps.len(), BASE_CAPABILITIES.len() + 1);
    }

    #[test]
    fn auto_queue_cannot_feed_itself() {
        let caps = capabilities(&playlist(false), true);
        assert!(!caps.contains(&Capability::AddToAutoQueue));
    }

    #[test]
    fn locked_flag_is_reported() {
        let caps = capabilities(&playlist(true), true);
        assert!(caps.contains(&Capability::Locked));
        assert_eq!(caps.len(), BASE_CAPABILITIES.len() + 1);
    }
}
