//! Configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/steamgrid/config.toml`
//! - Windows: `%APPDATA%/steamgrid/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use steamgrid_artwork::web_search::DEFAULT_SEARCH_URL;
use steamgrid_grid::{DEFAULT_JPEG_QUALITY, PipelineConfig};

/// Overlay directory name beside the executable.
const OVERLAYS_DIR_NAME: &str = "overlays by category";

/// Override directory name beside the executable.
const OVERRIDES_DIR_NAME: &str = "games";

/// steamgrid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Steam installation directory; detected when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_dir: Option<PathBuf>,

    /// Category overlays; `overlays by category` beside the executable when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays_dir: Option<PathBuf>,

    /// User-pinned images; `games` beside the executable when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides_dir: Option<PathBuf>,

    /// Enables SteamGridDB name search instead of the web search page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steamgriddb_api_key: Option<String>,

    /// Image search page; `{query}` is replaced by the encoded game name.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Seconds an endpoint may stay silent before the request fails.
    #[serde(default = "default_header_timeout_secs")]
    pub header_timeout_secs: u64,

    /// Image lookups in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Wait for Enter before exiting.
    #[serde(default = "default_true")]
    pub pause_on_exit: bool,
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.into()
}

fn default_header_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    1
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_dir: None,
            overlays_dir: None,
            overrides_dir: None,
            steamgriddb_api_key: None,
            search_url: default_search_url(),
            header_timeout_secs: default_header_timeout_secs(),
            concurrency: default_concurrency(),
            jpeg_quality: default_jpeg_quality(),
            pause_on_exit: default_true(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // The file may hold an API key.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn header_timeout(&self) -> Duration {
        Duration::from_secs(self.header_timeout_secs)
    }

    pub fn overlays_dir(&self) -> PathBuf {
        self.overlays_dir
            .clone()
            .unwrap_or_else(|| exe_dir().join(OVERLAYS_DIR_NAME))
    }

    pub fn overrides_dir(&self) -> PathBuf {
        self.overrides_dir
            .clone()
            .unwrap_or_else(|| exe_dir().join(OVERRIDES_DIR_NAME))
    }

    /// API key, ignoring a blank value.
    pub fn api_key(&self) -> Option<&str> {
        self.steamgriddb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            overrides_dir: self.overrides_dir(),
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
            concurrency: self.concurrency.max(1),
        }
    }
}

/// Directory holding the executable, or the working directory.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| anyhow::anyhow!("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("steamgrid").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("steamgrid")
            .join("config.toml"))
    }
}
