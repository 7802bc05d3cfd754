//! Application configuration management.
//!
//! Configuration is optional and read from
//! `~/.config/rosterboard/config.json`. It can replace the built-in staff
//! directory, choose where exported images are saved, and name a command
//! used to share them.
//!
//! ```json
//! {
//!   "staff": [{ "id": "p1", "name": "Alice", "role": "PT", "defaultColor": "white" }],
//!   "export_dir": "/home/me/Pictures/rosters",
//!   "share_command": ["xdg-open"]
//! }
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use rosterboard_core::{StaffDirectory, StaffMember};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "rosterboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Overrides `export_dir` when set
pub const EXPORT_DIR_ENV: &str = "ROSTERBOARD_EXPORT_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub staff: Option<Vec<StaffMember>>,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Program and leading arguments; the image path is appended.
    #[serde(default)]
    pub share_command: Option<Vec<String>>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_json(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// The configured staff list, or the built-in one.
    pub fn staff_directory(&self) -> Result<StaffDirectory> {
        match self.staff {
            Some(ref members) => StaffDirectory::new(members.clone())
                .context("Invalid staff list in config"),
            None => Ok(StaffDirectory::builtin()),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        resolve_export_dir(std::env::var(EXPORT_DIR_ENV).ok(), self.export_dir.clone())
    }
}

/// Environment first, then config, then the user's downloads folder.
pub fn resolve_export_dir(from_env: Option<String>, configured: Option<PathBuf>) -> PathBuf {
    from_env
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .or(configured)
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Where the TUI writes its log files.
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_NAME).join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterboard_core::StaffRole;

    #[test]
    fn test_empty_config_uses_builtin_staff() {
        let config = Config::from_json("{}").unwrap();
        assert!(config.staff.is_none());
        assert_eq!(config.staff_directory().unwrap(), StaffDirectory::builtin());
    }

    #[test]
    fn test_config_staff_list() {
        let config = Config::from_json(
            r#"{
                "staff": [
                    {"id": "a", "name": "Ana", "role": "PT", "defaultColor": "yellow"},
                    {"id": "b", "name": "Bo", "role": "Support"}
                ],
                "share_command": ["xdg-open"]
            }"#,
        )
        .unwrap();
        let directory = config.staff_directory().unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.role_of("b"), Some(StaffRole::Support));
        assert_eq!(config.share_command, Some(vec!["xdg-open".to_string()]));
    }

    #[test]
    fn test_duplicate_staff_ids_are_an_error() {
        let config = Config::from_json(
            r#"{"staff": [
                {"id": "a", "name": "Ana", "role": "PT"},
                {"id": "a", "name": "Abe", "role": "PT"}
            ]}"#,
        )
        .unwrap();
        let err = config.staff_directory().unwrap_err();
        assert!(format!("{:#}", err).contains("Duplicate staff id: a"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(Config::from_json(r#"{"staff": "everyone"}"#).is_err());
    }

    #[test]
    fn test_export_dir_precedence() {
        let configured = Some(PathBuf::from("/srv/rosters"));
        assert_eq!(
            resolve_export_dir(Some("/tmp/out".to_string()), configured.clone()),
            PathBuf::from("/tmp/out")
        );
        assert_eq!(
            resolve_export_dir(Some("  ".to_string()), configured.clone()),
            PathBuf::from("/srv/rosters")
        );
        assert_eq!(resolve_export_dir(None, configured), PathBuf::from("/srv/rosters"));
    }
}
