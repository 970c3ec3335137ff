//! Game library seam.

use crate::error::GridError;
use crate::game::{GameRecord, UserProfile};

/// Supplies user profiles and their games.
///
/// The host app implements this on top of the launcher's metadata files.
/// Using a trait keeps the pipeline independent of Steam's on-disk layout
/// and testable with in-memory libraries.
pub trait GameSource {
    /// Returns every profile whose grid should be republished.
    fn profiles(&self) -> Result<Vec<UserProfile>, GridError>;

    /// Returns the games of one profile.
    fn games(&self, profile: &UserProfile) -> Result<Vec<GameRecord>, GridError>;
}
