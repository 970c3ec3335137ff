//! Recovery of images from previous runs and user overrides.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::game::{Game, GameImage, ImageSource, StageOutcome};

/// Subdirectory of a grid holding the clean copies of published images.
pub const BACKUP_DIR: &str = "originals";

/// Accepted extensions, in lookup order; compared case-insensitively.
const CANDIDATE_EXTS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Seeds `game` with the first local image found.
///
/// Lookup order: the override directory, the backup of a previous run,
/// then the published image itself. The published image is only trusted
/// when no backup exists, since it may carry an overlay.
pub fn load_existing(override_dir: &Path, grid_dir: &Path, game: &Game) -> StageOutcome {
    if game.image.is_some() {
        return StageOutcome::Unchanged;
    }

    if let Some(image) = first_usable(candidates(override_dir, &game.id)) {
        return found(game, image);
    }

    let backups = candidates(&grid_dir.join(BACKUP_DIR), &game.id);
    let has_backup = !backups.is_empty();
    if let Some(image) = first_usable(backups) {
        return found(game, image);
    }
    if has_backup {
        tracing::warn!(game = %game.id, "backup unusable, image will be acquired again");
        return StageOutcome::Unchanged;
    }

    match first_usable(candidates(grid_dir, &game.id)) {
        Some(image) => found(game, image),
        None => StageOutcome::Unchanged,
    }
}

fn found(game: &Game, image: GameImage) -> StageOutcome {
    tracing::debug!(game = %game.id, source = %image.source, "found existing image");
    StageOutcome::Updated(game.with_image(image))
}

/// Files in `dir` named `<id>.<ext>`, ordered by extension preference.
fn candidates(dir: &Path, id: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to list existing images");
            return Vec::new();
        }
    };

    let mut found: Vec<(usize, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.file_stem()? != OsStr::new(id) {
                return None;
            }
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            let rank = CANDIDATE_EXTS.iter().position(|e| *e == ext)?;
            Some((rank, path))
        })
        .collect();
    found.sort();
    found.into_iter().map(|(_, path)| path).collect()
}

fn first_usable(paths: Vec<PathBuf>) -> Option<GameImage> {
    paths.into_iter().find_map(read_candidate)
}

fn read_candidate(path: PathBuf) -> Option<GameImage> {
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read existing image");
            return None;
        }
    };
    let source = ImageSource::Local(path.clone());
    let image = GameImage::sniff(bytes, source);
    if image.is_none() {
        tracing::warn!(path = %path.display(), "ignoring file with unknown image format");
    }
    image
}
