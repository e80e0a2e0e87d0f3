//! Setlist Core
//!
//! Storage-agnostic types, traits, and error handling for Setlist, an
//! ordered playlist store.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `PlaylistEntry`, `Track`, `ViewRow`, capability sets
//! - **Core Traits**: `TrackResolver`, the seam to the track-identity service
//! - **Renumbering Plans**: sentinel-safe position rewrites in [`reorder`]
//! - **Error Handling**: Unified `SetlistError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use setlist_core::reorder::plan_removal;
//!
//! // Removing rows 2 and 4 out of 5 deletes top-down and compacts after each
//! let steps = plan_removal([2, 4], 5).applied().unwrap();
//! assert_eq!(setlist_core::reorder::removed_count(&steps), 2);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod reorder;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SetlistError};
pub use traits::TrackResolver;

pub use types::{
    capabilities, Capability, CreatePlaylist, CreateTrack, Outcome, Playlist, PlaylistEntry, PlaylistId,
    SkipReason, Track, TrackId, TrackLocator, ViewKey, ViewRow, AUTO_QUEUE_PLAYLIST_NAME,
};
