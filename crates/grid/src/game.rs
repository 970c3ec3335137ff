//! Game records and the values flowing between pipeline stages.

use std::fmt;
use std::path::PathBuf;

use steamgrid_artwork::ImageKind;

use crate::error::GridError;

/// A user whose grid directory gets republished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub dir: PathBuf,
    /// Live grid directory read by the launcher.
    pub grid_dir: PathBuf,
}

/// A library entry as supplied by a [`crate::GameSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: String,
    pub name: Option<String>,
    /// Category label; empty when the game has none.
    pub category: String,
}

/// How a game's clean image was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Exact lookup in the official catalog.
    Official,
    /// Name search; may not be accurate.
    Search,
    /// Override, backup or previously published file.
    Local(PathBuf),
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Official => write!(f, "official"),
            ImageSource::Search => write!(f, "search"),
            ImageSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A clean (never overlaid) image with its sniffed encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameImage {
    pub bytes: Vec<u8>,
    pub kind: ImageKind,
    pub source: ImageSource,
}

impl GameImage {
    /// Wraps `bytes` if they are a JPEG or PNG.
    pub fn sniff(bytes: Vec<u8>, source: ImageSource) -> Option<Self> {
        let kind = ImageKind::sniff(&bytes)?;
        Some(Self {
            bytes,
            kind,
            source,
        })
    }
}

/// A game moving through the pipeline.
///
/// Created unresolved from a [`GameRecord`]; stages return updated copies
/// rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub name: Option<String>,
    pub category: String,
    pub image: Option<GameImage>,
    /// Composited bytes, same encoding as `image`.
    pub overlaid: Option<Vec<u8>>,
}

impl From<GameRecord> for Game {
    fn from(record: GameRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.filter(|n| !n.is_empty()),
            category: record.category,
            image: None,
            overlaid: None,
        }
    }
}

impl Game {
    /// Name for transcripts, falling back to the ID.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("unknown game with id {}", self.id),
        }
    }

    /// Copy of this game with a new clean image and no overlay.
    pub fn with_image(&self, image: GameImage) -> Self {
        Self {
            image: Some(image),
            overlaid: None,
            ..self.clone()
        }
    }

    /// The bytes that get published: overlaid if available, else clean.
    pub fn publish_bytes(&self) -> Option<&[u8]> {
        match (&self.overlaid, &self.image) {
            (Some(overlaid), Some(_)) => Some(overlaid.as_slice()),
            (None, Some(image)) => Some(image.bytes.as_slice()),
            (_, None) => None,
        }
    }

    /// File name (`<id><ext>`) of the published image.
    pub fn file_name(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|image| format!("{}{}", self.id, image.kind.ext()))
    }
}

/// Result of a single pipeline stage.
#[derive(Debug)]
pub enum StageOutcome {
    /// The stage had nothing to do.
    Unchanged,
    Updated(Game),
    Failed(GridError),
}
