//! Compass bearings in degrees: 0 = north/up, clockwise, range `[0, 360)`.

/// Folds any finite angle into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid may round a tiny negative input up to exactly 360.
    if d >= 360.0 { 0.0 } else { d }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn shortest_delta_deg(from: f64, to: f64) -> f64 {
    let d = normalize_deg(to - from);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Bearing of a screen-space offset (y down) from its origin.
///
/// `atan2(dy, dx)` measures from the +x axis; adding 90° moves zero to "up".
pub fn screen_delta_to_bearing(dx: f64, dy: f64) -> f64 {
    let mut deg = dy.atan2(dx).to_degrees() + 90.0;
    if deg < 0.0 {
        deg += 360.0;
    }
    if deg >= 360.0 { 0.0 } else { deg }
}
