//! Configuration for a console window

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::console::{Console, ConsoleError};
use crate::host::Font;

/// Window and console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window title
    pub title: String,
    /// Console width in cells
    pub width: i32,
    /// Console height in cells
    pub height: i32,
    /// Width of one cell in pixels
    pub tile_width: u32,
    /// Height of one cell in pixels
    pub tile_height: u32,
    /// Window scale factor
    pub scale: f64,
    /// Draw the measured frame rate over the console
    pub show_fps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Tessera".to_string(),
            width: 80,
            height: 25,
            tile_width: 8,
            tile_height: 16,
            scale: 1.0,
            show_fps: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the default location or return the default
    /// config
    pub fn load_or_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Check that sizes are non-zero and the scale is positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Invalid {
                field: "width/height",
                message: format!(
                    "console size must be positive, got {}x{}",
                    self.width, self.height
                ),
            });
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(ConfigError::Invalid {
                field: "tile_width/tile_height",
                message: "tile size must be non-zero".to_string(),
            });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "scale",
                message: format!("scale must be positive, got {}", self.scale),
            });
        }
        Ok(())
    }
}

/// Get the default config file path
fn default_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("tessera").join("config.json"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl Console {
    /// Create a root console with the size, title and frame rate overlay
    /// from `config`
    pub fn from_config(config: &Config, font: Arc<dyn Font>) -> Result<Self, ConsoleError> {
        let console = Console::new(config.width, config.height, font, config.title.clone())?;
        console.set_show_fps(config.show_fps)?;
        Ok(console)
    }
}
