//! Application configuration module
//!
//! Settings are persisted with `confy`, which picks the OS-specific config
//! directory and serializes the whole [`Settings`] struct.

use crate::constant::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, MAX_RECENT_FILES};
use crate::markdown::Dialect;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),
}

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating default if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = confy::load_path(path)?;
        info!("Load config from {:?}", path);
        Ok(Self { settings })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, &self.settings)?;
        info!("Save config to {:?}", path);
        Ok(())
    }

    /// Save in the background; settings changes come from the UI thread
    pub fn save_in_background(&self) {
        let config = Self {
            settings: self.settings.clone(),
        };
        std::thread::spawn(move || {
            if let Err(e) = config.save() {
                tracing::error!("Failed to save settings: {}", e);
            }
        });
    }

    /// Directory holding the autosaved draft.
    /// Falls back to a local "data" directory if platform dirs are unavailable
    pub fn data_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME) {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("data")
        }
    }

    /// Where file dialogs start: the user's documents folder, else home
    pub fn documents_dir() -> Option<PathBuf> {
        let dirs = UserDirs::new()?;
        Some(
            dirs.document_dir()
                .unwrap_or_else(|| dirs.home_dir())
                .to_path_buf(),
        )
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    /// Add a file to the recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        push_recent(&mut self.settings.recent_files, path);
        // Save changes in background since it's synchronous IO
        self.save_in_background();
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default settings: {}", e);
            Self {
                settings: Settings::default(),
            }
        })
    }
}

/// Move `path` to the front of `recent`, keeping at most [`MAX_RECENT_FILES`]
pub fn push_recent(recent: &mut Vec<PathBuf>, path: PathBuf) {
    recent.retain(|p| p != &path);
    recent.insert(0, path);
    recent.truncate(MAX_RECENT_FILES);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "🌙",
            Theme::Light => "☀",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,

    /// Editor and preview font size
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Recently opened file paths, most recent first
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,

    #[serde(default)]
    pub markdown: MarkdownSettings,
}

fn default_font_size() -> f32 {
    14.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: default_font_size(),
            recent_files: Vec::new(),
            markdown: MarkdownSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownSettings {
    #[serde(default)]
    pub dialect: Dialect,

    /// Render single newlines inside a paragraph as line breaks
    #[serde(default = "default_breaks")]
    pub breaks: bool,
}

fn default_breaks() -> bool {
    true
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            breaks: default_breaks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.markdown.dialect, Dialect::Extended);
        assert!(settings.markdown.breaks);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "light"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size, 14.0);
        assert!(settings.markdown.breaks);
    }

    #[test]
    fn redmine_is_an_alias_for_extended() {
        let settings: Settings =
            serde_json::from_str(r#"{"markdown": {"dialect": "redmine"}}"#).unwrap();
        assert_eq!(settings.markdown.dialect, Dialect::Extended);

        let settings: Settings =
            serde_json::from_str(r#"{"markdown": {"dialect": "standard", "breaks": false}}"#).unwrap();
        assert_eq!(settings.markdown.dialect, Dialect::Standard);
        assert!(!settings.markdown.breaks);
    }

    #[test]
    fn dialect_is_stored_lowercase() {
        let json = serde_json::to_value(MarkdownSettings::default()).unwrap();
        assert_eq!(json["dialect"], "extended");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("reddown_config_{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = Config {
            settings: Settings::default(),
        };
        config.settings.theme = Theme::Light;
        config.settings.font_size = 18.0;
        config.settings.markdown.dialect = Dialect::Standard;
        push_recent(&mut config.settings.recent_files, PathBuf::from("notes.md"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.settings.theme, Theme::Light);
        assert_eq!(loaded.settings.font_size, 18.0);
        assert_eq!(loaded.settings.markdown.dialect, Dialect::Standard);
        assert_eq!(loaded.settings.recent_files, vec![PathBuf::from("notes.md")]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = std::env::temp_dir().join(format!("reddown_config_{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.settings.theme, Theme::Dark);
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn recent_files_move_to_front() {
        let mut recent = vec![PathBuf::from("a.md"), PathBuf::from("b.md")];
        push_recent(&mut recent, PathBuf::from("b.md"));
        assert_eq!(recent, vec![PathBuf::from("b.md"), PathBuf::from("a.md")]);
    }

    #[test]
    fn recent_files_are_capped() {
        let mut recent = Vec::new();
        for i in 0..(MAX_RECENT_FILES + 5) {
            push_recent(&mut recent, PathBuf::from(format!("{i}.md")));
        }
        assert_eq!(recent.len(), MAX_RECENT_FILES);
        assert_eq!(recent[0], PathBuf::from(format!("{}.md", MAX_RECENT_FILES + 4)));
    }
}
