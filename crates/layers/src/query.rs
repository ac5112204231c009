use foundation::math::Vec2;

/// A feature returned by a rendered-feature query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFeature {
    /// Id of the style layer that drew the feature.
    pub layer_id: String,
}

impl RenderedFeature {
    pub fn new(layer_id: impl Into<String>) -> Self {
        Self {
            layer_id: layer_id.into(),
        }
    }
}

/// Axis-aligned screen rectangle in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square box of half-size `half_px` centred on `center`.
    pub fn around(center: Vec2, half_px: f64) -> Self {
        Self {
            min: Vec2::new(center.x - half_px, center.y - half_px),
            max: Vec2::new(center.x + half_px, center.y + half_px),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::{ScreenBox, Vec2};

    #[test]
    fn around_builds_symmetric_box() {
        let b = ScreenBox::around(Vec2::new(10.0, 20.0), 1.0);
        assert_eq!(b.min, Vec2::new(9.0, 19.0));
        assert_eq!(b.max, Vec2::new(11.0, 21.0));
        assert_eq!(b.center(), Vec2::new(10.0, 20.0));
    }
}
