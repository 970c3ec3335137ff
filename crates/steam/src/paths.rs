use std::path::{Path, PathBuf};

use crate::SteamError;

/// Provides access to Steam directory paths.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a new `Paths` instance with auto-detected Steam directory.
    pub fn new() -> Result<Self, SteamError> {
        let base_dir = get_base_dir()?;
        Ok(Self { base_dir })
    }

    /// Creates a new `Paths` instance with a custom base directory.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific user.
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.user_data_dir().join(user_id)
    }

    /// Returns the config directory for a user.
    pub fn config_dir(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("config")
    }

    /// Returns the grid artwork directory for a user.
    pub fn grid_dir(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join("grid")
    }

    /// Returns the path to localconfig.vdf (persona name lives here).
    pub fn local_config_path(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join("localconfig.vdf")
    }

    /// Returns the path to sharedconfig.vdf (per-app tags live here).
    pub fn shared_config_path(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id)
            .join("7")
            .join("remote")
            .join("sharedconfig.vdf")
    }

    /// Returns the main steamapps directory.
    pub fn steamapps_dir(&self) -> PathBuf {
        self.base_dir.join("steamapps")
    }

    /// Returns the path to libraryfolders.vdf.
    pub fn library_folders_path(&self) -> PathBuf {
        self.steamapps_dir().join("libraryfolders.vdf")
    }
}

// Platform-specific base directory detection.
#[cfg(target_os = "linux")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_linux::get_base_dir()
}

#[cfg(target_os = "windows")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_windows::get_base_dir()
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    Err(SteamError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_with_base() {
        let paths = Paths::with_base("/tmp/steam");
        assert_eq!(paths.base_dir(), Path::new("/tmp/steam"));
        assert_eq!(paths.user_data_dir(), PathBuf::from("/tmp/steam/userdata"));
    }

    #[test]
    fn user_dir_structure() {
        let paths = Paths::with_base("/steam");
        assert_eq!(
            paths.config_dir("12345"),
            PathBuf::from("/steam/userdata/12345/config")
        );
        assert_eq!(
            paths.grid_dir("12345"),
            PathBuf::from("/steam/userdata/12345/config/grid")
        );
        assert_eq!(
            paths.local_config_path("12345"),
            PathBuf::from("/steam/userdata/12345/config/localconfig.vdf")
        );
        assert_eq!(
            paths.shared_config_path("12345"),
            PathBuf::from("/steam/userdata/12345/7/remote/sharedconfig.vdf")
        );
    }

    #[test]
    fn library_paths() {
        let paths = Paths::with_base("/steam");
        assert_eq!(paths.steamapps_dir(), PathBuf::from("/steam/steamapps"));
        assert_eq!(
            paths.library_folders_path(),
            PathBuf::from("/steam/steamapps/libraryfolders.vdf")
        );
    }
}
