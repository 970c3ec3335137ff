use std::path::{Path, PathBuf};

use crate::SteamError;

/// Returns the Steam installation directory on Linux/Unix systems.
///
/// The first candidate that contains a `userdata` directory wins; a bare
/// `~/.steam/steam` symlink to a wiped install is not good enough.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(SteamError::NotFound)?;

    candidate_dirs(&home)
        .into_iter()
        .find(|dir| dir.join("userdata").is_dir())
        .ok_or(SteamError::NotFound)
}

/// Known install locations, in lookup order.
fn candidate_dirs(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        // Flatpak
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
    ]
}
