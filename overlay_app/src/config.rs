//! Overlay configuration
//!
//! Loaded from `overlay_app.toml` in the working directory; every field
//! has a default, so a missing or partial file still yields a runnable
//! setup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Window setup.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Initial width in screen coordinates.
    pub width: u32,
    /// Initial height in screen coordinates.
    pub height: u32,
    /// Title bar text.
    pub title: String,
    /// Swap with vertical sync.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "glint overlay".to_owned(),
            vsync: true,
        }
    }
}

/// Overlay content setup.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Background clear color, linear RGB.
    pub clear_color: [f32; 3],
    /// TTF/OTF file for overlay text; text is skipped when unset or
    /// unloadable.
    pub font_path: Option<PathBuf>,
    /// Rasterization size for the overlay font.
    pub font_size: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.10, 0.10, 0.12],
            font_path: None,
            font_size: 18.0,
        }
    }
}

/// Root of `overlay_app.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Window setup.
    pub window: WindowConfig,
    /// Overlay content setup.
    pub overlay: OverlayConfig,
}

impl AppConfig {
    /// Parses a TOML config file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::load_from_file(path)
        } else {
            log::info!("No {} found, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: AppConfig = toml::from_str("[window]\ntitle = \"demo\"").unwrap();
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.overlay.font_size, 18.0);
        assert!(config.overlay.font_path.is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[window]\nwdith = 640");
        assert!(result.is_err());
    }

    #[test]
    fn test_full_round_trip() {
        let text = r#"
            [window]
            width = 640
            height = 480
            title = "hud"
            vsync = false

            [overlay]
            clear_color = [0.0, 0.0, 0.0]
            font_path = "fonts/mono.ttf"
            font_size = 14.0
        "#;
        let config: AppConfig = toml::from_str(text).unwrap();
        assert_eq!(config.window.width, 640);
        assert!(!config.window.vsync);
        assert_eq!(config.overlay.clear_color, [0.0, 0.0, 0.0]);
        assert_eq!(
            config.overlay.font_path.as_deref(),
            Some(Path::new("fonts/mono.ttf"))
        );
    }
}
