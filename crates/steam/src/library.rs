//! Game library enumeration.
//!
//! A user's games come from two places: `sharedconfig.vdf`, which lists
//! every app the user has tagged or touched along with its library
//! categories, and the `appmanifest_*.acf` files of each library folder,
//! which carry the display names of installed apps.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::Paths;
use crate::vdf::{VdfNode, load_text_vdf};

/// A game in a user's Steam library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamGame {
    pub app_id: String,
    pub name: Option<String>,
    /// User categories in the order Steam stores them.
    pub tags: Vec<String>,
}

impl SteamGame {
    /// The category used for overlays: the first tag, or empty.
    pub fn category(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("")
    }
}

/// Returns the games of a user, ordered by app ID.
///
/// Missing or malformed files are skipped with a warning; an empty library
/// is a valid result.
pub fn get_games(paths: &Paths, user_id: &str) -> Vec<SteamGame> {
    let mut games: BTreeMap<String, SteamGame> = BTreeMap::new();

    for (app_id, tags) in read_tagged_apps(&paths.shared_config_path(user_id)) {
        games.insert(
            app_id.clone(),
            SteamGame {
                app_id,
                name: None,
                tags,
            },
        );
    }

    for folder in library_folders(paths) {
        for (app_id, name) in read_installed_apps(&folder.join("steamapps")) {
            games
                .entry(app_id.clone())
                .or_insert_with(|| SteamGame {
                    app_id,
                    name: None,
                    tags: Vec::new(),
                })
                .name = Some(name);
        }
    }

    games.into_values().collect()
}

/// Reads `apps/<id>/tags` from sharedconfig.vdf.
fn read_tagged_apps(path: &Path) -> Vec<(String, Vec<String>)> {
    let root = match load_text_vdf(path) {
        Ok(root) => root,
        Err(e) => {
            tracing::warn!("skipping categories, {e}");
            return Vec::new();
        }
    };

    // The root key differs between Steam versions, so take whatever is first.
    let Some((_, store)) = root.entries().first() else {
        return Vec::new();
    };
    let Some(apps) = store.path(&["Software", "Valve", "Steam", "apps"]) else {
        return Vec::new();
    };

    apps.entries()
        .iter()
        .filter(|(id, _)| is_app_id(id))
        .map(|(id, app)| {
            let tags = app
                .get("tags")
                .map(|tags| {
                    tags.entries()
                        .iter()
                        .filter_map(|(_, tag)| tag.as_str())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            (id.clone(), tags)
        })
        .collect()
}

/// Returns the main install dir plus every folder in libraryfolders.vdf.
fn library_folders(paths: &Paths) -> Vec<PathBuf> {
    let mut folders = vec![paths.base_dir().to_path_buf()];

    let root = match load_text_vdf(&paths.library_folders_path()) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!("no extra library folders: {e}");
            return folders;
        }
    };
    let Some((_, list)) = root.entries().first() else {
        return folders;
    };

    for (key, entry) in list.entries() {
        if !is_app_id(key) {
            continue;
        }
        // Old format stores the path as the value, new format nests it.
        let path = match entry {
            VdfNode::Value(path) => Some(path.as_str()),
            VdfNode::Object(_) => entry.get("path").and_then(VdfNode::as_str),
        };
        if let Some(path) = path {
            let path = PathBuf::from(path);
            if !folders.contains(&path) {
                folders.push(path);
            }
        }
    }

    folders
}

/// Reads `(appid, name)` pairs from the app manifests in a steamapps dir.
fn read_installed_apps(steamapps: &Path) -> Vec<(String, String)> {
    let Ok(entries) = fs::read_dir(steamapps) else {
        return Vec::new();
    };

    let mut apps = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if !(file_name.starts_with("appmanifest_") && file_name.ends_with(".acf")) {
            continue;
        }

        let manifest = match load_text_vdf(&entry.path()) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!("skipping app manifest: {e}");
                continue;
            }
        };
        let Some(state) = manifest.get("AppState") else {
            continue;
        };
        let app_id = state.get("appid").and_then(VdfNode::as_str);
        let name = state.get("name").and_then(VdfNode::as_str);
        if let (Some(app_id), Some(name)) = (app_id, name) {
            apps.push((app_id.to_string(), name.to_string()));
        }
    }

    apps
}

fn is_app_id(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
