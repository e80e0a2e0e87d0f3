//! Track references as seen by the ordered store

use super::ids::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Library track record
///
/// Owned by the track resolver. The ordered store never reads these fields;
/// the view projection joins them in for display and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub location: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Soft-deleted: removed from the library without being purged
    pub deleted: bool,
    pub added_at: DateTime<Utc>,
}

/// Data for adding a track to the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrack {
    pub location: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// What a caller hands to the resolver: either a known id or a file location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackLocator {
    Id(TrackId),
    Path(PathBuf),
}

impl From<TrackId> for TrackLocator {
    fn from(id: TrackId) -> Self {
        Self::Id(id)
    }
}

impl From<PathBuf> for TrackLocator {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for TrackLocator {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl fmt::Display for TrackLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "track #{}", id),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_display() {
        assert_eq!(TrackLocator::from(TrackId::new(9)).to_string(), "track #9");
        assert_eq!(TrackLocator::from("/music/a.flac").to_string(), "/music/a.flac");
    }
}
