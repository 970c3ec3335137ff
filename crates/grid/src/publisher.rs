//! Staged publishing of a grid directory.
//!
//! Images are written into `"<grid> new"` and the finished directory is
//! swapped in with two renames. The live grid is moved aside to
//! `"<grid> old"` first, so a failure at any point leaves either the old
//! or the new grid in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::GridError;
use crate::existing::BACKUP_DIR;
use crate::game::Game;

/// `"<grid> new"`.
pub fn staging_dir(grid_dir: &Path) -> PathBuf {
    sibling(grid_dir, " new")
}

fn retired_dir(grid_dir: &Path) -> PathBuf {
    sibling(grid_dir, " old")
}

fn sibling(dir: &Path, suffix: &str) -> PathBuf {
    let mut name = dir.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Creates an empty staging directory with its backup subdirectory.
///
/// Leftovers from an interrupted run are removed first.
pub fn prepare_staging(grid_dir: &Path) -> Result<PathBuf, GridError> {
    let staging = staging_dir(grid_dir);
    let staging_err = |source| GridError::Staging {
        path: staging.clone(),
        source,
    };

    if staging.exists() {
        tracing::warn!(path = %staging.display(), "removing stale staging directory");
        fs::remove_dir_all(&staging).map_err(staging_err)?;
    }
    fs::create_dir_all(staging.join(BACKUP_DIR)).map_err(staging_err)?;
    Ok(staging)
}

/// Writes the clean image to `<staging>/originals/<id><ext>`.
pub fn backup_game(staging: &Path, game: &Game) -> Result<(), GridError> {
    let (Some(image), Some(file_name)) = (&game.image, game.file_name()) else {
        return Ok(());
    };
    write_file(&staging.join(BACKUP_DIR).join(file_name), &image.bytes)
}

/// Writes the overlaid (or clean) image to `<staging>/<id><ext>`.
pub fn publish_game(staging: &Path, game: &Game) -> Result<(), GridError> {
    let (Some(bytes), Some(file_name)) = (game.publish_bytes(), game.file_name()) else {
        return Ok(());
    };
    write_file(&staging.join(file_name), bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), GridError> {
    fs::write(path, bytes).map_err(|source| GridError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Swaps the staging directory into place.
///
/// The live grid is renamed aside, the staging directory renamed in, and
/// the old grid deleted. A failed second rename restores the old grid.
pub fn replace_grid(staging: &Path, grid_dir: &Path) -> Result<(), GridError> {
    let retired = retired_dir(grid_dir);
    let swap_err = |path: &Path, source| GridError::Swap {
        path: path.to_path_buf(),
        source,
    };

    if retired.exists() {
        fs::remove_dir_all(&retired).map_err(|e| swap_err(&retired, e))?;
    }

    let had_live = match fs::rename(grid_dir, &retired) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(swap_err(grid_dir, e)),
    };

    if let Err(e) = fs::rename(staging, grid_dir) {
        if had_live && let Err(restore) = fs::rename(&retired, grid_dir) {
            tracing::error!(
                path = %retired.display(),
                error = %restore,
                "failed to restore previous grid"
            );
        }
        return Err(swap_err(grid_dir, e));
    }

    if had_live && let Err(e) = fs::remove_dir_all(&retired) {
        tracing::warn!(path = %retired.display(), error = %e, "failed to remove old grid");
    }
    tracing::info!(path = %grid_dir.display(), "grid replaced");
    Ok(())
}

/// Restores `"<grid> old"` when a crash left no live grid behind.
pub fn recover_interrupted_swap(grid_dir: &Path) -> Result<(), GridError> {
    let retired = retired_dir(grid_dir);
    if grid_dir.exists() || !retired.is_dir() {
        return Ok(());
    }
    tracing::warn!(path = %retired.display(), "restoring grid from interrupted swap");
    fs::rename(&retired, grid_dir).map_err(|source| GridError::Swap {
        path: grid_dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameImage, GameRecord, ImageSource};
    use crate::testutil;

    fn game(bytes: Vec<u8>) -> Game {
        let game = Game::from(GameRecord {
            id: "42".into(),
            name: Some("Foo".into()),
            category: String::new(),
        });
        game.with_image(GameImage::sniff(bytes, ImageSource::Official).unwrap())
    }

    #[test]
    fn sibling_names() {
        let grid = Path::new("/steam/userdata/1/config/grid");
        assert_eq!(
            staging_dir(grid),
            PathBuf::from("/steam/userdata/1/config/grid new")
        );
        assert_eq!(
            retired_dir(grid),
            PathBuf::from("/steam/userdata/1/config/grid old")
        );
    }

    #[test]
    fn prepare_removes_stale_staging() {
        let tmp = tempfile::tempdir().unwrap();
        let grid = tmp.path().join("grid");
        let stale = staging_dir(&grid);
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("leftover.jpg"), b"x").unwrap();

        let staging = prepare_staging(&grid).unwrap();
        assert_eq!(staging, stale);
        assert!(staging.join(BACKUP_DIR).is_dir());
        assert!(!staging.join("leftover.jpg").exists());
    }

    #[test]
    fn backup_and_publish_write_expected_files() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = prepare_staging(&tmp.path().join("grid")).unwrap();
        let clean = testutil::jpeg(2, 2, [1, 2, 3]);
        let mut game = game(clean.clone());
        game.overlaid = Some(b"overlaid".to_vec());

        backup_game(&staging, &game).unwrap();
        publish_game(&staging, &game).unwrap();

        assert_eq!(fs::read(staging.join("originals/42.jpg")).unwrap(), clean);
        assert_eq!(fs::read(staging.join("42.jpg")).unwrap(), b"overlaid");
    }

    #[test]
    fn write_failure_is_recoverable() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = publish_game(&missing, &game(testutil::jpeg(1, 1, [0, 0, 0]))).unwrap_err();
        assert!(matches!(err, GridError::Write { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn replace_swaps_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let grid = tmp.path().join("grid");
        fs::create_dir_all(&grid).unwrap();
        fs::write(grid.join("old.jpg"), b"old").unwrap();

        let staging = prepare_staging(&grid).unwrap();
        fs::write(staging.join("42.jpg"), b"new").unwrap();
        replace_grid(&staging, &grid).unwrap();

        assert_eq!(fs::read(grid.join("42.jpg")).unwrap(), b"new");
        assert!(!grid.join("old.jpg").exists());
        assert!(!staging.exists());
        assert!(!retired_dir(&grid).exists());
    }

    #[test]
    fn replace_without_live_grid() {
        let tmp = tempfile::tempdir().unwrap();
        let grid = tmp.path().join("grid");
        let staging = prepare_staging(&grid).unwrap();
        replace_grid(&staging, &grid).unwrap();
        assert!(grid.join(BACKUP_DIR).is_dir());
    }

    #[test]
    fn failed_swap_keeps_live_grid() {
        let tmp = tempfile::tempdir().unwrap();
        let grid = tmp.path().join("grid");
        fs::create_dir_all(&grid).unwrap();
        fs::write(grid.join("42.jpg"), b"live").unwrap();

        // Staging directory was never created.
        let err = replace_grid(&staging_dir(&grid), &grid).unwrap_err();
        assert!(matches!(err, GridError::Swap { .. }));
        assert!(err.is_fatal());
        assert_eq!(fs::read(grid.join("42.jpg")).unwrap(), b"live");
        assert!(!retired_dir(&grid).exists());
    }

    #[test]
    fn recovers_grid_after_crash_between_renames() {
        let tmp = tempfile::tempdir().unwrap();
        let grid = tmp.path().join("grid");
        let retired = retired_dir(&grid);
        fs::create_dir_all(&retired).unwrap();
        fs::write(retired.join("42.jpg"), b"live").unwrap();

        recover_interrupted_swap(&grid).unwrap();
        assert_eq!(fs::read(grid.join("42.jpg")).unwrap(), b"live");
        assert!(!retired.exists());

        // Nothing to do the second time.
        recover_interrupted_swap(&grid).unwrap();
    }
}
