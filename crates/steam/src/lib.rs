pub mod library;
pub mod paths;
#[cfg(target_os = "linux")]
pub mod paths_linux;
#[cfg(target_os = "windows")]
pub mod paths_windows;
pub mod users;
pub mod vdf;

// Re-export primary types.
pub use library::{SteamGame, get_games};
pub use paths::Paths;
pub use users::{User, get_users, get_users_with_paths};
pub use vdf::{VdfNode, load_text_vdf, parse_text_vdf};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("VDF parse error: {0}")]
    Vdf(String),

    #[error("I/O error: {0}")]
    Io(String),
}
