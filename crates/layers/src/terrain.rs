use serde::{Deserialize, Serialize};

use crate::map::MapView;
use crate::query::{RenderedFeature, ScreenBox};

/// Elevations at or below this height (meters) count as sea.
pub const SEA_LEVEL_THRESHOLD_M: f64 = 0.5;

/// Half-size of the feature query box around the projected centre (pixels).
pub const PROBE_HALF_PX: f64 = 1.0;

const WATER_LAYER: &str = "water";
const BLOCKING_LAYERS: [&str; 3] = ["building", "landuse", "park"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    Water,
    Mix,
}

impl std::fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerrainKind::Water => f.write_str("water"),
            TerrainKind::Mix => f.write_str("mix"),
        }
    }
}

/// What lies under the viewport centre this frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    pub kind: TerrainKind,
    pub elevation: f64,
}

impl Default for TerrainSample {
    fn default() -> Self {
        Self {
            kind: TerrainKind::Mix,
            elevation: 0.0,
        }
    }
}

/// Scans features topmost first; the first water or blocking layer decides.
pub fn center_is_water(features: &[RenderedFeature]) -> bool {
    for f in features {
        if f.layer_id.contains(WATER_LAYER) {
            return true;
        }
        if BLOCKING_LAYERS.iter().any(|b| f.layer_id.contains(b)) {
            return false;
        }
    }
    false
}

pub fn classify(elevation: f64, is_water: bool) -> TerrainKind {
    if elevation <= SEA_LEVEL_THRESHOLD_M || is_water {
        TerrainKind::Water
    } else {
        TerrainKind::Mix
    }
}

/// Samples elevation and land cover under the map centre.
pub fn analyze_map<M: MapView + ?Sized>(map: &M) -> TerrainSample {
    if !map.is_ready() {
        return TerrainSample::default();
    }

    let center = map.center();
    let point = map.projected_center();

    let elevation = match map.terrain_elevation(center) {
        Ok(Some(e)) if e.is_finite() => e,
        Ok(_) => 0.0,
        Err(err) => {
            tracing::debug!("elevation query failed: {err}");
            0.0
        }
    };

    let features = map.rendered_features(ScreenBox::around(point, PROBE_HALF_PX));
    let kind = classify(elevation, center_is_water(&features));

    TerrainSample { kind, elevation }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapError, MapStyle};
    use foundation::math::{LngLat, Vec2};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct FixedMap {
        ready: bool,
        elevation: Result<Option<f64>, MapError>,
        features: Vec<RenderedFeature>,
        style: MapStyle,
        last_box: RefCell<Option<ScreenBox>>,
    }

    impl FixedMap {
        fn new(elevation: f64, layers: &[&str]) -> Self {
            Self {
                ready: true,
                elevation: Ok(Some(elevation)),
                features: layers.iter().map(|l| RenderedFeature::new(*l)).collect(),
                style: MapStyle::default(),
                last_box: RefCell::new(None),
            }
        }
    }

    impl MapView for FixedMap {
        fn init(&mut self) -> Result<(), MapError> {
            self.ready = true;
            Ok(())
        }
        fn is_ready(&self) -> bool {
            self.ready
        }
        fn center(&self) -> LngLat {
            LngLat::new(0.0, 0.0)
        }
        fn projected_center(&self) -> Vec2 {
            Vec2::new(400.0, 300.0)
        }
        fn terrain_elevation(&self, _at: LngLat) -> Result<Option<f64>, MapError> {
            self.elevation.clone()
        }
        fn rendered_features(&self, bbox: ScreenBox) -> Vec<RenderedFeature> {
            *self.last_box.borrow_mut() = Some(bbox);
            self.features.clone()
        }
        fn style(&self) -> &MapStyle {
            &self.style
        }
        fn set_style(&mut self, style: MapStyle) {
            self.style = style;
        }
        fn jump_to(&mut self, _center: LngLat, _bearing_deg: f64) {}
    }

    fn features(layers: &[&str]) -> Vec<RenderedFeature> {
        layers.iter().map(|l| RenderedFeature::new(*l)).collect()
    }

    #[test]
    fn sea_level_boundary_is_inclusive() {
        assert_eq!(classify(0.5, false), TerrainKind::Water);
        assert_eq!(classify(0.500_000_1, false), TerrainKind::Mix);
        assert_eq!(classify(-20.0, false), TerrainKind::Water);
    }

    #[test]
    fn blocking_layer_before_water_wins() {
        assert!(!center_is_water(&features(&["building_1", "water_x"])));
        assert!(!center_is_water(&features(&["landuse", "water"])));
        assert!(!center_is_water(&features(&["national_park", "water"])));
    }

    #[test]
    fn water_before_blocking_layer_wins() {
        assert!(center_is_water(&features(&["water_x", "building_1"])));
    }

    #[test]
    fn unrelated_layers_are_skipped() {
        assert!(center_is_water(&features(&["road-primary", "waterway-label"])));
        assert!(!center_is_water(&features(&["road", "hillshade"])));
        assert!(!center_is_water(&[]));
    }

    #[test]
    fn not_ready_map_yields_default_sample() {
        let mut map = FixedMap::new(-100.0, &["water"]);
        map.ready = false;
        assert_eq!(analyze_map(&map), TerrainSample::default());
    }

    #[test]
    fn high_ground_with_water_feature_is_water() {
        let map = FixedMap::new(1200.0, &["water_x", "building_1"]);
        let sample = analyze_map(&map);
        assert_eq!(
            sample,
            TerrainSample {
                kind: TerrainKind::Water,
                elevation: 1200.0
            }
        );
    }

    #[test]
    fn high_ground_under_building_is_mix() {
        let map = FixedMap::new(1200.0, &["building_1", "water_x"]);
        assert_eq!(analyze_map(&map).kind, TerrainKind::Mix);
    }

    #[test]
    fn failed_or_missing_elevation_reads_as_zero() {
        let mut map = FixedMap::new(0.0, &["building"]);
        map.elevation = Err(MapError::Terrain("dem not loaded".into()));
        let sample = analyze_map(&map);
        assert_eq!(sample.elevation, 0.0);
        assert_eq!(sample.kind, TerrainKind::Water);

        map.elevation = Ok(None);
        assert_eq!(analyze_map(&map).elevation, 0.0);

        map.elevation = Ok(Some(f64::NAN));
        assert_eq!(analyze_map(&map).elevation, 0.0);
    }

    #[test]
    fn queries_two_pixel_box_around_center() {
        let map = FixedMap::new(100.0, &[]);
        analyze_map(&map);
        let bbox = map.last_box.borrow().expect("feature query ran");
        assert_eq!(bbox.min, Vec2::new(399.0, 299.0));
        assert_eq!(bbox.max, Vec2::new(401.0, 301.0));
    }
}
