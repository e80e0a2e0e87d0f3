/// Core traits for Setlist
use crate::error::Result;
use crate::types::{TrackId, TrackLocator};
use async_trait::async_trait;

/// Track identity resolver
///
/// Maps a location or identifier to a stable track identity. Implementations
/// own the add/undelete/dedup policy: resolving an already known location
/// yields the existing id, and a soft-deleted track is brought back when
/// `allow_undelete` is set.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve one locator
    ///
    /// # Errors
    /// Returns `SetlistError::UnresolvableTrack` if no usable identity exists
    async fn resolve(&self, locator: &TrackLocator, allow_undelete: bool) -> Result<TrackId>;

    /// Resolve a batch, one result per input, in input order
    ///
    /// Each element is resolved independently; one failure does not affect
    /// the others.
    async fn resolve_many(
        &self,
        locators: &[TrackLocator],
        allow_undelete: bool,
    ) -> Vec<Result<TrackId>> {
        let mut resolved = Vec::with_capacity(locators.len());
        for locator in locators {
            resolved.push(self.resolve(locator, allow_undelete).await);
        }
        resolved
    }
}
