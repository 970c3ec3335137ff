//! Steam-backed game source.

use steamgrid_grid::{GameRecord, GameSource, GridError, UserProfile};
use steamgrid_steam::{Paths, get_games, get_users_with_paths};

/// Profiles and games read from a Steam installation.
pub struct SteamLibrary {
    paths: Paths,
}

impl SteamLibrary {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }
}

impl GameSource for SteamLibrary {
    fn profiles(&self) -> Result<Vec<UserProfile>, GridError> {
        let users = get_users_with_paths(&self.paths).map_err(|e| {
            GridError::Library(format!(
                "{e} (looked in {})",
                self.paths.base_dir().display()
            ))
        })?;

        Ok(users
            .into_iter()
            .map(|user| UserProfile {
                grid_dir: self.paths.grid_dir(&user.id),
                name: user.name,
                dir: user.dir,
            })
            .collect())
    }

    fn games(&self, profile: &UserProfile) -> Result<Vec<GameRecord>, GridError> {
        let user_id = profile
            .dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                GridError::Library(format!("not a user directory: {}", profile.dir.display()))
            })?;

        Ok(get_games(&self.paths, user_id)
            .into_iter()
            .map(|game| GameRecord {
                category: game.category().to_string(),
                id: game.app_id,
                name: game.name,
            })
            .collect())
    }
}
