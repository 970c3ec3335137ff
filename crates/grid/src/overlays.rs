//! Category overlays.
//!
//! Overlays live in a flat directory, one image per category, named after
//! the category (`Indie.png`, `favorite.png`, ...). Keys are case-insensitive.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::GridError;

/// A decoded overlay image.
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Lowercased category key.
    pub category: String,
    /// File contents as read from disk.
    pub bytes: Vec<u8>,
    pub image: RgbaImage,
}

/// An overlay file that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOverlay {
    pub path: PathBuf,
    pub reason: String,
}

/// Category → overlay mapping, read-only after load.
#[derive(Debug, Default)]
pub struct OverlayCatalog {
    overlays: HashMap<String, Overlay>,
    skipped: Vec<SkippedOverlay>,
}

impl OverlayCatalog {
    /// Looks up the overlay for a category, ignoring case.
    pub fn get(&self, category: &str) -> Option<&Overlay> {
        if category.is_empty() {
            return None;
        }
        self.overlays.get(&category.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Sorted category keys.
    pub fn categories(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.overlays.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Files that were ignored while loading.
    pub fn skipped(&self) -> &[SkippedOverlay] {
        &self.skipped
    }

    fn skip(&mut self, path: PathBuf, reason: String) {
        tracing::warn!(path = %path.display(), %reason, "skipping overlay");
        self.skipped.push(SkippedOverlay { path, reason });
    }
}

/// Loads every decodable image in `dir`.
///
/// A missing directory yields an empty catalog. Any other failure to list
/// the directory is fatal; failures on individual files are not.
pub fn load_overlays(dir: &Path) -> Result<OverlayCatalog, GridError> {
    let mut catalog = OverlayCatalog::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "overlay directory missing");
            return Ok(catalog);
        }
        Err(source) => {
            return Err(GridError::OverlayDir {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| GridError::OverlayDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && ImageFormat::from_path(&path).is_ok() {
            paths.push(path);
        }
    }
    // Deterministic winner when two files share a stem.
    paths.sort();

    for path in paths {
        let Some(category) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
        else {
            catalog.skip(path, "file name is not valid UTF-8".into());
            continue;
        };

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                catalog.skip(path, e.to_string());
                continue;
            }
        };
        let image = match image::load_from_memory(&bytes) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                catalog.skip(path, e.to_string());
                continue;
            }
        };

        if catalog.overlays.contains_key(&category) {
            catalog.skip(path, format!("duplicate overlay for category {category}"));
            continue;
        }
        tracing::debug!(%category, path = %path.display(), "loaded overlay");
        catalog.overlays.insert(
            category.clone(),
            Overlay {
                category,
                bytes,
                image,
            },
        );
    }

    Ok(catalog)
}
