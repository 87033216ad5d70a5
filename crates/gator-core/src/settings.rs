//! Per-user settings file (`~/.gatorconfig.json`).
//!
//! Holds the database URL and the name of the currently logged-in user. Only
//! one CLI invocation touches the file at a time, so reads and writes are
//! plain whole-file operations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub db_url: Option<String>,
    #[serde(default)]
    pub current_user_name: Option<String>,
}

impl Settings {
    /// Read settings from `path`. A missing file yields empty settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SettingsIo`] if the file exists but cannot be
    /// read, or [`ConfigError::SettingsParse`] if it is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::SettingsIo {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| ConfigError::SettingsParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Write settings to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SettingsIo`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::SettingsIo {
            path: path.display().to_string(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SettingsParse {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Set the current user and persist immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SettingsIo`] if the file cannot be written.
    pub fn set_user(&mut self, name: &str, path: &Path) -> Result<(), ConfigError> {
        self.current_user_name = Some(name.to_string());
        self.save(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gator-settings-{tag}-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = scratch_path("missing");
        let settings = Settings::load(&path).expect("missing file is not an error");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_original_key_names() {
        let path = scratch_path("keys");
        std::fs::write(
            &path,
            r#"{"db_url":"postgres://localhost/gator","current_user_name":"kahya"}"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.db_url.as_deref(), Some("postgres://localhost/gator"));
        assert_eq!(settings.current_user_name.as_deref(), Some("kahya"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn set_user_persists_and_keeps_db_url() {
        let path = scratch_path("set-user");
        let mut settings = Settings {
            db_url: Some("postgres://localhost/gator".to_string()),
            current_user_name: None,
        };

        settings.set_user("holgith", &path).unwrap();
        let reloaded = Settings::load(&path).unwrap();

        assert_eq!(reloaded.current_user_name.as_deref(), Some("holgith"));
        assert_eq!(reloaded.db_url.as_deref(), Some("postgres://localhost/gator"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let path = scratch_path("invalid");
        std::fs::write(&path, "{not json").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::SettingsParse { .. }), "got {err:?}");

        std::fs::remove_file(&path).ok();
    }
}
