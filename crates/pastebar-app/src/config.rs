//! Loading and saving the settings file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::settings::Settings;

const CONFIG_DIR: &str = "pastebar";
const CONFIG_FILE: &str = "settings.toml";

const DEFAULT_CONFIG_HEADER: &str = r#"# PasteBar settings
#
# Keys mirror the names used by the PasteBar settings screens.
#
# [settings]
# historyExclusionList / historyExclusionAppList / autoMaskWordsList:
#   newline separated entries, e.g. """
#   password
#   token"""
# historyDetectLanguagesEnabledList: at most 7 languages
# autoClearSettingsDurationType: "days" (1-6), "weeks" (1-3), "months" (1, 3, 6, 8) or "year" (1-2)
# customDbPath: omit to keep data in the default location

"#;

/// Top-level settings file, stored at `<config dir>/pastebar/settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Clipboard history settings.
    #[serde(default)]
    pub settings: Settings,
}

impl SettingsConfig {
    /// Default location of the settings file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load settings from `path`. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed, or holds
    /// settings that fail validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .settings
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(config)
    }

    /// Write settings to `path`, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error when serialization or any filesystem step fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let body = toml::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Default settings file with an explanatory header.
    ///
    /// # Errors
    /// Returns an error when the defaults cannot be serialized.
    pub fn generate_default_toml() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default()).context("failed to serialize default settings")?;
        Ok(format!("{DEFAULT_CONFIG_HEADER}{body}"))
    }
}
