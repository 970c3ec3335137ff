//! Grid image pipeline.
//!
//! This crate implements the **business logic** of republishing a Steam
//! grid directory. It has no UI and no HTTP of its own: the host supplies
//! games through [`GameSource`] and images through
//! [`steamgrid_artwork::ImageProvider`], and progress flows out as
//! [`PipelineEvent`]s.
//!
//! # Pipeline (per user profile)
//!
//! 1. **Load existing**: recover overrides, backups and published images
//! 2. **Acquire**: download images for games that still have none
//! 3. **Overlay**: stamp the category overlay onto the clean image
//! 4. **Publish**: write backups and final images into a staging directory
//! 5. **Swap**: replace the live grid directory with the staging directory

pub mod acquire;
pub mod compositor;
pub mod error;
pub mod existing;
pub mod game;
pub mod overlays;
pub mod pipeline;
pub mod publisher;
pub mod source;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export primary types for convenience.
pub use acquire::download_image;
pub use compositor::{DEFAULT_JPEG_QUALITY, apply_overlay};
pub use error::{GridError, Severity};
pub use existing::{BACKUP_DIR, load_existing};
pub use game::{Game, GameImage, GameRecord, ImageSource, StageOutcome, UserProfile};
pub use overlays::{Overlay, OverlayCatalog, SkippedOverlay, load_overlays};
pub use pipeline::{FailedGame, GameRef, Pipeline, PipelineConfig, PipelineEvent, RunSummary};
pub use publisher::{
    backup_game, prepare_staging, publish_game, recover_interrupted_swap, replace_grid,
    staging_dir,
};
pub use source::GameSource;
