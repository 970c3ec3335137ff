use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::SteamError;
use crate::paths::Paths;
use crate::vdf::{VdfNode, load_text_vdf};

/// A Steam user found under `userdata/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Persona name, or the numeric ID when localconfig.vdf has none.
    pub name: String,
    pub dir: PathBuf,
}

/// Returns a list of Steam users from the auto-detected installation.
pub fn get_users() -> Result<Vec<User>, SteamError> {
    let paths = Paths::new()?;
    get_users_with_paths(&paths)
}

/// Returns users using the provided `Paths` instance.
pub fn get_users_with_paths(paths: &Paths) -> Result<Vec<User>, SteamError> {
    let user_data_dir = paths.user_data_dir();

    let entries = fs::read_dir(&user_data_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound
        } else {
            SteamError::Io(e.to_string())
        }
    })?;

    let mut users = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let id = entry.file_name().to_string_lossy().into_owned();

        // Verify it's a numeric user ID
        if id.parse::<u64>().is_err() {
            continue;
        }

        // "0" is a placeholder directory, not a real user.
        if id == "0" {
            continue;
        }

        let name = persona_name(paths, &id).unwrap_or_else(|| id.clone());
        users.push(User {
            dir: paths.user_dir(&id),
            id,
            name,
        });
    }

    users.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(users)
}

/// Reads `friends/PersonaName` from a user's localconfig.vdf.
fn persona_name(paths: &Paths, user_id: &str) -> Option<String> {
    let path = paths.local_config_path(user_id);
    let root = match load_text_vdf(&path) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!(user = user_id, "no persona name: {e}");
            return None;
        }
    };

    root.path(&["UserLocalConfigStore", "friends", "PersonaName"])
        .and_then(VdfNode::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_users_with_temp_dir() {
        let tmp = tempfile::tempdir().unwrap();

        // Create fake Steam directory
        let userdata = tmp.path().join("userdata");
        fs::create_dir_all(userdata.join("12345").join("config")).unwrap();
        fs::create_dir_all(userdata.join("67890").join("config")).unwrap();
        fs::create_dir_all(userdata.join("0").join("config")).unwrap();
        fs::create_dir_all(userdata.join("anonymous")).unwrap();

        fs::write(
            userdata.join("12345").join("config").join("localconfig.vdf"),
            "\"UserLocalConfigStore\"\n{\n\t\"friends\"\n\t{\n\t\t\"PersonaName\"\t\t\"Freeman\"\n\t}\n}\n",
        )
        .unwrap();

        let paths = Paths::with_base(tmp.path());
        let users = get_users_with_paths(&paths).unwrap();

        // Should have 2 users (skipping "0" and non-numeric dirs)
        assert_eq!(users.len(), 2);

        assert_eq!(users[0].id, "12345");
        assert_eq!(users[0].name, "Freeman");
        assert_eq!(users[0].dir, userdata.join("12345"));

        // Falls back to the ID without a localconfig.vdf
        assert_eq!(users[1].id, "67890");
        assert_eq!(users[1].name, "67890");
    }

    #[test]
    fn missing_userdata_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base(tmp.path());
        assert!(matches!(
            get_users_with_paths(&paths),
            Err(SteamError::NotFound)
        ));
    }

    #[test]
    fn user_json_field_names() {
        let user = User {
            id: "123".into(),
            name: "Freeman".into(),
            dir: PathBuf::from("/steam/userdata/123"),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"name\":\"Freeman\""));
    }
}
