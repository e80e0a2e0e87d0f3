//! Results of structural mutations that may be skipped without it being an error

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a structural mutation did not touch the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The playlist is locked against structural changes
    PlaylistLocked,
    /// Position input was out of range and could not be clamped
    InvalidPosition,
    /// No track could be resolved for the given locator(s)
    UnresolvableTrack,
    /// The request would leave the ordering as it is
    Unchanged,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PlaylistLocked => "playlist is locked",
            Self::InvalidPosition => "invalid position",
            Self::UnresolvableTrack => "track could not be resolved",
            Self::Unchanged => "nothing to change",
        };
        f.write_str(text)
    }
}

/// Outcome of a structural mutation
///
/// Locked playlists, out-of-range positions and unresolvable tracks are
/// expected, UI-driven edge cases: they come back as `Skipped` rather than
/// as errors. Store failures are still `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T> {
    Applied(T),
    Skipped(SkipReason),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The applied value, if any
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Applied(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Applied(value) => Outcome::Applied(f(value)),
            Self::Skipped(reason) => Outcome::Skipped(reason),
        }
    }
}
