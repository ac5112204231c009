use foundation::math::{LngLat, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::{RenderedFeature, ScreenBox};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("map is not initialised")]
    NotReady,

    #[error("terrain query failed: {0}")]
    Terrain(String),

    #[error("map setup failed: {0}")]
    Setup(String),
}

/// A map style reference, e.g. `mapbox://styles/mapbox/outdoors-v12`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapStyle(pub String);

impl MapStyle {
    pub const OUTDOORS: &'static str = "mapbox://styles/mapbox/outdoors-v12";
    pub const SATELLITE: &'static str = "mapbox://styles/mapbox/satellite-streets-v12";
    pub const DARK: &'static str = "mapbox://styles/mapbox/dark-v11";

    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MapStyle {
    fn default() -> Self {
        Self::new(Self::OUTDOORS)
    }
}

impl std::fmt::Display for MapStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The map renderer as seen by the sampler and the camera.
pub trait MapView {
    fn init(&mut self) -> Result<(), MapError>;

    /// `false` until the renderer has a map to query.
    fn is_ready(&self) -> bool;

    fn center(&self) -> LngLat;

    /// Screen position of [`MapView::center`] in CSS pixels.
    fn projected_center(&self) -> Vec2;

    /// Rendered terrain height at `at`; `Ok(None)` when no terrain is loaded there.
    fn terrain_elevation(&self, at: LngLat) -> Result<Option<f64>, MapError>;

    /// Rendered features intersecting `bbox`, topmost first.
    fn rendered_features(&self, bbox: ScreenBox) -> Vec<RenderedFeature>;

    fn style(&self) -> &MapStyle;

    fn set_style(&mut self, style: MapStyle);

    fn jump_to(&mut self, center: LngLat, bearing_deg: f64);
}
