use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::persistence::{PersistenceError, PersistenceResult};

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "EMOJI_ART_DATA_DIR";
/// Name of the optional config file inside the data directory
pub const CONFIG_FILE: &str = "emoji_art.json";

/// Application settings. Every field has a default, so a partial config
/// file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Font size, in screen points, of newly dropped emoji
    pub default_emoji_font_size: f32,
    /// Which palette store to load
    pub palette_store_name: String,
    /// Where documents and the config file live
    pub data_dir: PathBuf,
    /// Name of the document opened at startup
    pub document_name: String,
    /// Double-tapping the background zooms it to fit
    pub double_tap_zooms_to_fit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_emoji_font_size: 40.0,
            palette_store_name: "Default".to_owned(),
            data_dir: default_data_dir(),
            document_name: "Untitled".to_owned(),
            double_tap_zooms_to_fit: true,
        }
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join("emoji_art"))
        .unwrap_or_else(|| PathBuf::from(".emoji_art"))
}

impl AppConfig {
    /// Loads the config from the data directory, falling back to defaults.
    pub fn load() -> Self {
        let defaults = Self::default();
        let path = defaults.data_dir.join(CONFIG_FILE);
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return defaults;
        }
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path.display(), err);
                defaults
            }
        }
    }

    pub fn load_from(path: &Path) -> PersistenceResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PersistenceError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    fn validated(self) -> PersistenceResult<Self> {
        if !(self.default_emoji_font_size.is_finite() && self.default_emoji_font_size >= 1.0) {
            return Err(PersistenceError::InvalidState(format!(
                "default_emoji_font_size must be at least 1, got {}",
                self.default_emoji_font_size
            )));
        }
        if self.palette_store_name.trim().is_empty() {
            return Err(PersistenceError::InvalidState(
                "palette_store_name must not be empty".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "default_emoji_font_size": 64.0 }"#).unwrap();
        assert_eq!(config.default_emoji_font_size, 64.0);
        assert_eq!(config.palette_store_name, "Default");
        assert!(config.double_tap_zooms_to_fit);
    }

    #[test]
    fn test_invalid_font_size_is_rejected() {
        let result = AppConfig::from_json(r#"{ "default_emoji_font_size": 0.0 }"#);
        assert!(matches!(result, Err(PersistenceError::InvalidState(_))));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            AppConfig::from_json("{"),
            Err(PersistenceError::SerializationError(_))
        ));
    }
}
