//! Pipeline error types.

use std::io;
use std::path::PathBuf;

/// Whether an error ends the run or only the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

/// Errors produced by the grid pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("failed to read overlay directory {}: {source}", path.display())]
    OverlayDir { path: PathBuf, source: io::Error },

    #[error("game library error: {0}")]
    Library(String),

    #[error("no users found; has Steam been used on this computer?")]
    NoProfiles,

    #[error("failed to create staging directory {}: {source}", path.display())]
    Staging { path: PathBuf, source: io::Error },

    #[error("failed to replace grid directory {}: {source}", path.display())]
    Swap { path: PathBuf, source: io::Error },

    #[error("failed to identify image format for game {game_id}")]
    UnknownImageFormat { game_id: String },

    #[error("failed to download image for game {game_id}: {source}")]
    Transport {
        game_id: String,
        source: steamgrid_artwork::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl GridError {
    /// Classifies the error for the orchestrator.
    ///
    /// Transport errors are fatal: a dead network would otherwise turn
    /// every remaining game into "not found".
    pub fn severity(&self) -> Severity {
        match self {
            GridError::Decode(_) | GridError::Encode(_) | GridError::Write { .. } => {
                Severity::Recoverable
            }
            GridError::OverlayDir { .. }
            | GridError::Library(_)
            | GridError::NoProfiles
            | GridError::Staging { .. }
            | GridError::Swap { .. }
            | GridError::UnknownImageFormat { .. }
            | GridError::Transport { .. } => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
