mod capabilities;
mod ids;
mod outcome;
mod playlist;
mod track;
mod view;

pub use capabilities::{capabilities, Capability};
pub use ids::{PlaylistId, TrackId};
pub use outcome::{Outcome, SkipReason};
pub use playlist::{CreatePlaylist, Playlist, PlaylistEntry, AUTO_QUEUE_PLAYLIST_NAME};
pub use track::{CreateTrack, Track, TrackLocator};
pub use view::{ViewKey, ViewRow};
