use std::path::PathBuf;

use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

use crate::SteamError;

/// Returns the Steam installation directory on Windows using the registry.
///
/// The per-user `SteamPath` is preferred since it follows a moved install;
/// the machine-wide `InstallPath` keys are the fallback.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    if let Ok(key) = hkcu.open_subkey(r"Software\Valve\Steam") {
        if let Ok(path) = key.get_value::<String, _>("SteamPath") {
            return Ok(PathBuf::from(path));
        }
    }

    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    for subkey in [r"SOFTWARE\Wow6432Node\Valve\Steam", r"SOFTWARE\Valve\Steam"] {
        let install_path = hklm
            .open_subkey(subkey)
            .and_then(|key| key.get_value::<String, _>("InstallPath"));
        if let Ok(path) = install_path {
            return Ok(PathBuf::from(path));
        }
    }

    Err(SteamError::NotFound)
}
