//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::render::text::atlas_packer::MAX_ATLAS_DIMENSION;
use crate::render::text::BuildOptions;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Format is picked by extension
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed fine but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Text Configuration
///
/// Display and font-loading settings for the UI text system. Loaded once at
/// startup; the screen size may change later through
/// [`TextContext::set_screen_size`](crate::TextContext::set_screen_size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Display scaling applied to every requested font height
    pub ui_scale: f32,
    /// Screen width in UI pixels
    pub screen_width: u32,
    /// Screen height in UI pixels
    pub screen_height: u32,
    /// Round atlas dimensions up to powers of two for targets that need it
    pub require_pot: bool,
    /// Largest atlas width or height accepted before the build fails (at most 16384)
    pub max_atlas_size: u32,
    /// Pixel height of the default font
    pub default_font_height: u32,
    /// Pixel height of the small font
    pub small_font_height: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            screen_width: 800,
            screen_height: 600,
            require_pot: false,
            max_atlas_size: 4096,
            default_font_height: 14,
            small_font_height: 10,
        }
    }
}

impl Config for TextConfig {}

impl TextConfig {
    /// Set the UI scale factor
    pub fn with_ui_scale(mut self, scale: f32) -> Self {
        self.ui_scale = scale;
        self
    }

    /// Set the screen dimensions
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Require power-of-two atlas textures
    pub fn with_pot(mut self, required: bool) -> Self {
        self.require_pot = required;
        self
    }

    /// Set the font heights used by [`FontRegistry::load`](crate::FontRegistry::load)
    pub fn with_font_heights(mut self, default: u32, small: u32) -> Self {
        self.default_font_height = default;
        self.small_font_height = small;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ui_scale.is_finite() && self.ui_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ui_scale must be a positive number, got {}",
                self.ui_scale
            )));
        }

        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::Invalid("screen dimensions must be non-zero".to_string()));
        }

        if self.max_atlas_size == 0 || self.max_atlas_size > MAX_ATLAS_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "max_atlas_size must be in 1..={}, got {}",
                MAX_ATLAS_DIMENSION, self.max_atlas_size
            )));
        }

        if self.default_font_height == 0 || self.small_font_height == 0 {
            return Err(ConfigError::Invalid("font heights must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Options for building a single font from this configuration
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            ui_scale: self.ui_scale,
            require_pot: self.require_pot,
            max_atlas_size: self.max_atlas_size,
        }
    }
}
