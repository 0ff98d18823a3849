use std::path::{Path, PathBuf};

use chatterbox::ChatSettings;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};

pub const SETTINGS_DIRECTORY_NAME: &str = "chatterbox";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub chat: ChatSettings,
    /// Directory holding the message log; defaults to the user data dir.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

impl AppSettings {
    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing or does not parse.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return Self::default();
        }

        let figment = Figment::from(Serialized::defaults(Self::default())).merge(Json::file(path));

        match figment.extract::<Self>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.chat = self.chat.normalized();
        self
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }
}

pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIRECTORY_NAME)
        .join(SETTINGS_FILE_NAME)
}

pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIRECTORY_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let settings = AppSettings::load(&dir.path().join(SETTINGS_FILE_NAME));

        assert_eq!(settings, AppSettings::default());
        assert!(settings.chat.persistence_enabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"chat":{"persistence_enabled":false,"greeting":"Hi there"},"storage_dir":"/var/lib/chat"}"#,
        )
        .unwrap();

        let settings = AppSettings::load(&path);

        assert!(!settings.chat.persistence_enabled);
        assert_eq!(settings.chat.greeting, "Hi there");
        assert_eq!(settings.chat.base_delay_ms, 700);
        assert_eq!(settings.storage_dir(), PathBuf::from("/var/lib/chat"));
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{"chat":{"base_delay_ms":"soon"}}"#).unwrap();

        assert_eq!(AppSettings::load(&path), AppSettings::default());
    }
}
