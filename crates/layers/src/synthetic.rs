//! Procedural stand-in for a map renderer.
//!
//! Elevation is fractal value noise over longitude/latitude, biased so a
//! good share of the surface sits below sea level. Land cover is a second noise field that
//! stacks `building`, `landuse_park` and inland `water` layers in rendering
//! order, topmost first, so the same classifier runs against it as against a
//! real renderer.

use foundation::math::{LngLat, Vec2, Viewport};

use crate::map::{MapError, MapStyle, MapView};
use crate::query::{RenderedFeature, ScreenBox};

const ELEVATION_SCALE_M: f64 = 4_000.0;
const SEA_BIAS: f64 = 0.42;
const OCTAVES: u32 = 5;
/// Degrees per noise cell at the lowest octave.
const BASE_CELL_DEG: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct SyntheticMap {
    viewport: Viewport,
    bearing_deg: f64,
    style: MapStyle,
    seed: u64,
    ready: bool,
}

impl SyntheticMap {
    pub fn new(viewport: Viewport, style: MapStyle, seed: u64) -> Self {
        Self {
            viewport,
            bearing_deg: 0.0,
            style,
            seed,
            ready: false,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn bearing_deg(&self) -> f64 {
        self.bearing_deg
    }

    /// Ground height at `p` (meters, negative below sea level).
    pub fn elevation_at(&self, p: LngLat) -> f64 {
        let n = fractal_noise(p.lng / BASE_CELL_DEG, p.lat / BASE_CELL_DEG, self.seed);
        (n - SEA_BIAS) * ELEVATION_SCALE_M
    }

    /// Style layers covering `p`, topmost first.
    pub fn layers_at(&self, p: LngLat) -> Vec<&'static str> {
        let elevation = self.elevation_at(p);
        if elevation <= 0.0 {
            return vec!["water"];
        }

        let cover = fractal_noise(p.lng / 0.05, p.lat / 0.05, self.seed ^ 0xC0FFEE);
        let lakes = fractal_noise(p.lng / 0.12, p.lat / 0.12, self.seed ^ 0x1A4E);

        let mut layers = Vec::new();
        if cover > 0.72 {
            layers.push("building");
        }
        if lakes > 0.78 && elevation < 1_500.0 {
            layers.push("water");
        }
        if cover > 0.55 {
            layers.push("landuse_park");
        }
        layers.push("land");
        layers
    }
}

impl MapView for SyntheticMap {
    fn init(&mut self) -> Result<(), MapError> {
        self.ready = true;
        tracing::info!(
            lng = self.viewport.center.lng,
            lat = self.viewport.center.lat,
            zoom = self.viewport.zoom,
            "synthetic map ready"
        );
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn center(&self) -> LngLat {
        self.viewport.center
    }

    fn projected_center(&self) -> Vec2 {
        self.viewport.project(self.viewport.center)
    }

    fn terrain_elevation(&self, at: LngLat) -> Result<Option<f64>, MapError> {
        if !self.ready {
            return Err(MapError::NotReady);
        }
        Ok(Some(self.elevation_at(at)))
    }

    fn rendered_features(&self, bbox: ScreenBox) -> Vec<RenderedFeature> {
        let at = self.viewport.unproject(bbox.center());
        self.layers_at(at)
            .into_iter()
            .map(RenderedFeature::new)
            .collect()
    }

    fn style(&self) -> &MapStyle {
        &self.style
    }

    fn set_style(&mut self, style: MapStyle) {
        tracing::info!(%style, "map style changed");
        self.style = style;
    }

    fn jump_to(&mut self, center: LngLat, bearing_deg: f64) {
        self.viewport.center = center.wrapped();
        self.bearing_deg = bearing_deg;
    }
}

fn hash2(ix: i64, iy: i64, seed: u64) -> f64 {
    // splitmix64 finaliser over the packed lattice coordinates.
    let mut z = seed
        ^ (ix as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (iy as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn value_noise(x: f64, y: f64, seed: u64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);
    let (ix, iy) = (x0 as i64, y0 as i64);

    let a = hash2(ix, iy, seed);
    let b = hash2(ix + 1, iy, seed);
    let c = hash2(ix, iy + 1, seed);
    let d = hash2(ix + 1, iy + 1, seed);

    let top = a + (b - a) * tx;
    let bottom = c + (d - c) * tx;
    top + (bottom - top) * ty
}

/// Sum of octaves, normalised to `[0, 1]`.
fn fractal_noise(x: f64, y: f64, seed: u64) -> f64 {
    let mut sum = 0.0;
    let mut amp = 1.0;
    let mut norm = 0.0;
    let mut freq = 1.0;
    for octave in 0..OCTAVES {
        sum += amp * value_noise(x * freq, y * freq, seed.wrapping_add(octave as u64));
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    sum / norm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{TerrainKind, analyze_map};

    fn map(seed: u64) -> SyntheticMap {
        let vp = Viewport::new(LngLat::new(-3.2, 55.9), 11.0, 800.0, 600.0);
        let mut m = SyntheticMap::new(vp, MapStyle::default(), seed);
        m.init().expect("synthetic init never fails");
        m
    }

    #[test]
    fn noise_is_deterministic_and_bounded() {
        for i in 0..200 {
            let x = i as f64 * 0.37 - 20.0;
            let y = i as f64 * -0.11 + 3.0;
            let a = fractal_noise(x, y, 7);
            assert_eq!(a, fractal_noise(x, y, 7));
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn uninitialised_map_is_not_ready() {
        let vp = Viewport::new(LngLat::new(0.0, 0.0), 3.0, 100.0, 100.0);
        let m = SyntheticMap::new(vp, MapStyle::default(), 1);
        assert!(!m.is_ready());
        assert_eq!(m.terrain_elevation(m.center()), Err(MapError::NotReady));
    }

    #[test]
    fn submerged_points_render_only_water() {
        let m = map(3);
        let mut found = false;
        for i in 0..2_000 {
            let p = LngLat::new(-10.0 + i as f64 * 0.01, 50.0 + (i % 37) as f64 * 0.1);
            if m.elevation_at(p) <= 0.0 {
                assert_eq!(m.layers_at(p), vec!["water"]);
                found = true;
                break;
            }
        }
        assert!(found, "expected some sea in a 20 degree sweep");
    }

    #[test]
    fn both_terrain_kinds_occur_along_a_transect() {
        let mut m = map(11);
        let mut kinds = std::collections::HashSet::new();
        for i in 0..400 {
            m.jump_to(LngLat::new(-20.0 + i as f64 * 0.1, 40.0), 90.0);
            kinds.insert(analyze_map(&m).kind);
        }
        assert!(kinds.contains(&TerrainKind::Water));
        assert!(kinds.contains(&TerrainKind::Mix));
    }

    #[test]
    fn jump_to_moves_center_and_keeps_projection_centered() {
        let mut m = map(5);
        m.jump_to(LngLat::new(12.0, 41.9), 45.0);
        assert_eq!(m.center(), LngLat::new(12.0, 41.9));
        assert_eq!(m.bearing_deg(), 45.0);
        let p = m.projected_center();
        assert!((p.x - 400.0).abs() < 1e-6 && (p.y - 300.0).abs() < 1e-6);
    }
}
