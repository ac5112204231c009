use std::fs;
use std::path::Path;

use director::{AudioConfig, WandererConfig};
use foundation::math::{LngLat, Viewport};
use layers::MapStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub style: MapStyle,
    pub start_lng: f64,
    pub start_lat: f64,
    pub zoom: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Seed of the procedural map used by the native front end.
    pub world_seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: MapStyle::default(),
            start_lng: -5.93,
            start_lat: 54.6,
            zoom: 12.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            world_seed: 42,
        }
    }
}

impl MapConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            LngLat::new(self.start_lng, self.start_lat),
            self.zoom,
            self.viewport_width,
            self.viewport_height,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub fps: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { fps: 60.0 }
    }
}

/// Everything tunable about a session. Every field has a default, so a
/// config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub audio: AudioConfig,
    pub wanderer: WandererConfig,
    pub frame: FrameConfig,
}

impl AppConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
