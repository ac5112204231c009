use super::{LngLat, MAX_MERCATOR_LAT, Vec2};

/// Size of one web-mercator tile in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Absolute web-mercator pixel coordinates at `zoom`.
pub fn lnglat_to_world_px(p: LngLat, zoom: f64) -> Vec2 {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (p.lng + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * scale;
    Vec2::new(x, y)
}

pub fn world_px_to_lnglat(px: Vec2, zoom: f64) -> LngLat {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lng = px.x / scale * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * px.y / scale);
    let lat = n.sinh().atan().to_degrees();
    LngLat::new(lng, lat)
}

/// A north-up map viewport of `width` x `height` CSS pixels centred on `center`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub center: LngLat,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: LngLat, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Screen position of a geographic point.
    pub fn project(&self, p: LngLat) -> Vec2 {
        let origin = lnglat_to_world_px(self.center, self.zoom);
        let world = lnglat_to_world_px(p, self.zoom);
        world - origin + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Geographic point under a screen position.
    pub fn unproject(&self, screen: Vec2) -> LngLat {
        let origin = lnglat_to_world_px(self.center, self.zoom);
        let world = origin + screen - Vec2::new(self.width / 2.0, self.height / 2.0);
        world_px_to_lnglat(world, self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::{LngLat, Vec2, Viewport};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let vp = Viewport::new(LngLat::new(-122.4, 37.8), 12.0, 800.0, 600.0);
        let p = vp.project(vp.center);
        assert_close(p.x, 400.0, 1e-6);
        assert_close(p.y, 300.0, 1e-6);
    }

    #[test]
    fn unproject_inverts_project() {
        let vp = Viewport::new(LngLat::new(8.5, 47.3), 10.0, 1024.0, 768.0);
        let ll = vp.unproject(Vec2::new(100.0, 700.0));
        let back = vp.project(ll);
        assert_close(back.x, 100.0, 1e-6);
        assert_close(back.y, 700.0, 1e-6);
    }

    #[test]
    fn east_is_right_north_is_up() {
        let vp = Viewport::new(LngLat::new(0.0, 0.0), 5.0, 100.0, 100.0);
        assert!(vp.project(LngLat::new(1.0, 0.0)).x > 50.0);
        assert!(vp.project(LngLat::new(0.0, 1.0)).y < 50.0);
    }
}
