//! Map configuration loaded from a TOML file.
//!
//! ```toml
//! scheme = "grayscale"
//!
//! [layout]
//! width = 1200.0
//! height = 900.0
//! padding = 12.0
//! ```
//!
//! An inline `[colors]` table replaces the named scheme entirely. Every
//! key is optional; a missing file section falls back to the defaults.

use std::path::Path;

use election_map_navigator::MapLayout;
use election_map_render::{ColorError, ColorScheme, colors::DEFAULT_SCHEME, scheme};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown color scheme: {0}")]
    UnknownScheme(String),

    #[error("Color error: {0}")]
    Color(#[from] ColorError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    scheme: Option<String>,
    layout: MapLayout,
    colors: Option<ColorScheme>,
}

/// Resolved settings for drawing the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub layout: MapLayout,
    pub colors: ColorScheme,
}

impl MapConfig {
    /// Loads `path`, or the defaults when no path is given.
    ///
    /// `scheme_override` takes precedence over the file's `scheme` key but
    /// not over an inline `[colors]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, names a
    /// scheme that is not embedded, or has an inline color that is not a hex
    /// code.
    pub fn load(path: Option<&Path>, scheme_override: Option<&str>) -> Result<Self, ConfigError> {
        let raw = match path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                std::fs::read_to_string(path)?
            }
            None => String::new(),
        };
        Self::from_toml(&raw, scheme_override)
    }

    fn from_toml(text: &str, scheme_override: Option<&str>) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::de::from_str(text)?;

        let colors = match raw.colors {
            Some(colors) => {
                colors.validate()?;
                colors
            }
            None => {
                let id = scheme_override
                    .or(raw.scheme.as_deref())
                    .unwrap_or(DEFAULT_SCHEME);
                scheme(id).ok_or_else(|| ConfigError::UnknownScheme(id.to_string()))?
            }
        };

        Ok(Self {
            layout: raw.layout,
            colors,
        })
    }
}
