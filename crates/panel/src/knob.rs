use foundation::math::screen_delta_to_bearing;

use crate::dom::Rect;

/// Compass bearing of a pointer offset `(dx, dy)` from the knob centre.
///
/// Up is 0°, right is 90°; the result is always in `[0, 360)`.
pub fn knob_angle(dx: f64, dy: f64) -> f64 {
    screen_delta_to_bearing(dx, dy)
}

/// Bearing of the pointer at `(x, y)` relative to the centre of `rect`.
pub fn knob_angle_in(rect: Rect, x: f64, y: f64) -> f64 {
    let c = rect.center();
    knob_angle(x - c.x, y - c.y)
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct KnobState {
    pub dragging: bool,
    pub angle_deg: f64,
}
