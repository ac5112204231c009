/// Spherical earth radius used by web-mercator maps (meters).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit of the web-mercator projection (degrees).
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Wraps longitude into `[-180, 180)` and clamps latitude to the mercator limit.
    pub fn wrapped(self) -> Self {
        let lng = (self.lng + 180.0).rem_euclid(360.0) - 180.0;
        let lat = self.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        Self { lng, lat }
    }
}

/// Great-circle destination from `origin` travelling `distance_m` along `bearing_deg`.
pub fn destination(origin: LngLat, bearing_deg: f64, distance_m: f64) -> LngLat {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lng.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    LngLat::new(lambda2.to_degrees(), phi2.to_degrees()).wrapped()
}
