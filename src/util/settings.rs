//! Persistent user settings.
//!
//! Settings live in one flat JSON object keyed by dot-notation names
//! (e.g. `speechNav.enabled`) in `settings.json` under the platform config directory.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "neuroadapt";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Voice navigation on/off, persisted across restarts
pub const SPEECH_NAV_ENABLED_KEY: &str = "speechNav.enabled";

/// Selected ADHD color theme
pub const ADHD_THEME_KEY: &str = "adhd.theme";

/// Errors from reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("Failed to read settings: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to save settings: {0}")]
    Persist(String),
}

/// Default settings file path
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
        .ok_or(SettingsError::NoConfigDir)
}

/// Typed get/set over a settings backend.
pub trait SettingsAccess {
    /// Raw value for `key`.
    fn get_value(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key` and persist.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;

    /// Get a setting value by key, deserialized.
    ///
    /// Returns None when the key is missing or holds a value of a different type.
    fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_value(key)
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Serialize and store a setting value.
    fn set_setting<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value)
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get_setting(key).unwrap_or(false)
    }
}

/// Settings backed by a JSON file
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsFile {
    /// Empty settings that will be written to `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: Map::new(),
        }
    }

    /// Load settings from `path`; a missing file yields empty settings
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        crate::debug!("Loading settings from {:?}", path);

        if !path.exists() {
            return Ok(Self::new(path));
        }

        let content = fs::read_to_string(&path)?;
        let values = match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self { path, values })
    }

    /// Load from `path`, falling back to empty settings on any error
    pub fn load_or_default(path: PathBuf) -> Self {
        match Self::load(path.clone()) {
            Ok(settings) => settings,
            Err(e) => {
                crate::warn!("Ignoring unreadable settings at {:?}: {}", path, e);
                Self::new(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist settings using atomic write (temp file + rename)
    fn persist(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::Persist(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(&self.values)?;
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| SettingsError::Persist(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| SettingsError::Persist(format!("Failed to write: {}", e)))?;
            file.sync_all()
                .map_err(|e| SettingsError::Persist(format!("Failed to sync: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SettingsError::Persist(format!("Failed to rename: {}", e))
        })?;

        crate::trace!("Settings persisted to {:?}", self.path);
        Ok(())
    }
}

impl SettingsAccess for SettingsFile {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
