// Softbreak Settings Module
// File-backed send-key preferences, standing in for the external
// storage collaborator that owns the persisted record

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use softbreak_core::SendKeyConfig;

/// Errors that can occur when loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(String),

    #[error("no source path set")]
    NoSourcePath,
}

/// TOML representation of the settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsToml {
    #[serde(default)]
    send_keys: SendKeyConfig,
}

/// Persisted user preferences.
///
/// Loaded from a TOML file (default: ~/.config/softbreak/settings.toml)
/// holding the four send-key booleans. A missing file or missing field
/// means "submits" — the engine's compiled-in default.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    send_keys: SendKeyConfig,
    source_path: Option<PathBuf>,
}

impl Settings {
    /// Defaults: every modifier submits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;
        Ok(Self {
            send_keys: parsed.send_keys,
            source_path: None,
        })
    }

    /// Serialize the current settings as TOML
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        let repr = SettingsToml {
            send_keys: self.send_keys,
        };
        toml::to_string_pretty(&repr).map_err(|e| SettingsError::TomlSerialize(e.to_string()))
    }

    /// Write the whole record back, never individual fields.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SettingsError> {
        std::fs::write(&path, self.to_toml()?)?;
        self.source_path = Some(path.as_ref().to_path_buf());
        Ok(())
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("softbreak").join("settings.toml"))
    }

    /// Load from the default location, falling back to defaults when
    /// the file does not exist.
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    pub fn send_keys(&self) -> SendKeyConfig {
        self.send_keys
    }

    pub fn set_send_keys(&mut self, config: SendKeyConfig) {
        self.send_keys = config;
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        let path = self
            .source_path
            .clone()
            .ok_or(SettingsError::NoSourcePath)?;
        let reloaded = Self::from_file(path)?;
        *self = reloaded;
        Ok(())
    }
}

/// Default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Softbreak Settings
# Which modifier+Enter combinations send the message.
# A modifier set to false inserts a line break instead.
# Place this file at: ~/.config/softbreak/settings.toml

[send_keys]
alt = true
shift = true
ctrl = true
meta = true
"#
}
