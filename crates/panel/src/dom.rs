use std::collections::{BTreeMap, BTreeSet};

use foundation::math::Vec2;

/// Pseudo-id addressing the document body.
pub const BODY: &str = "body";

/// Element bounding box in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// The slice of a document the control panel touches.
///
/// Operations on missing elements are no-ops.
pub trait Dom {
    fn exists(&self, id: &str) -> bool;

    fn has_class(&self, id: &str, class: &str) -> bool;

    fn add_class(&mut self, id: &str, class: &str);

    fn remove_class(&mut self, id: &str, class: &str);

    /// Flips `class` and returns whether it is now present.
    fn toggle_class(&mut self, id: &str, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.has_class(id, class)
        }
    }

    /// Sets an inline style property; an empty value clears it.
    fn set_style(&mut self, id: &str, property: &str, value: &str);

    fn set_text(&mut self, id: &str, text: &str);

    fn rect(&self, id: &str) -> Option<Rect>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub classes: BTreeSet<String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub rect: Rect,
}

/// In-memory document used by the native front end and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDom {
    elements: BTreeMap<String, Element>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        let mut elements = BTreeMap::new();
        elements.insert(BODY.to_string(), Element::default());
        Self { elements }
    }
}

impl MemoryDom {
    /// A document holding only the body.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document with every panel element present.
    pub fn with_panel() -> Self {
        let mut dom = Self::new();
        for id in crate::ids::ALL {
            dom.insert(id);
        }
        dom.set_rect(crate::ids::HEADING_KNOB, Rect::new(100.0, 100.0, 60.0, 60.0));
        dom.add_class(crate::ids::PLAY_BTN, crate::ids::class::HIGHLIGHT_PULSE);
        dom.add_class(crate::ids::ZEN_OVERLAY, crate::ids::class::HIDDEN);
        dom
    }

    pub fn insert(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    pub fn remove(&mut self, id: &str) {
        if id != BODY {
            self.elements.remove(id);
        }
    }

    pub fn set_rect(&mut self, id: &str, rect: Rect) {
        if let Some(el) = self.elements.get_mut(id) {
            el.rect = rect;
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn style(&self, id: &str, property: &str) -> Option<&str> {
        self.elements
            .get(id)
            .and_then(|el| el.style.get(property))
            .map(String::as_str)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|el| el.text.as_str())
    }
}

impl Dom for MemoryDom {
    fn exists(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|el| el.classes.contains(class))
    }

    fn add_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.elements.get_mut(id) {
            el.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.elements.get_mut(id) {
            el.classes.remove(class);
        }
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) {
        let Some(el) = self.elements.get_mut(id) else {
            return;
        };
        if value.is_empty() {
            el.style.remove(property);
        } else {
            el.style.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.elements.get_mut(id) {
            el.text = text.to_string();
        }
    }

    fn rect(&self, id: &str) -> Option<Rect> {
        self.elements.get(id).map(|el| el.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_elements_are_ignored() {
        let mut dom = MemoryDom::new();
        dom.add_class("nope", "x");
        dom.set_text("nope", "t");
        assert!(!dom.exists("nope"));
        assert!(!dom.has_class("nope", "x"));
        assert_eq!(dom.rect("nope"), None);
    }

    #[test]
    fn toggle_reports_new_state() {
        let mut dom = MemoryDom::new();
        assert!(dom.toggle_class(BODY, "zen-mode"));
        assert!(dom.has_class(BODY, "zen-mode"));
        assert!(!dom.toggle_class(BODY, "zen-mode"));
        assert!(!dom.toggle_class("missing", "zen-mode"));
    }

    #[test]
    fn empty_style_value_clears_property() {
        let mut dom = MemoryDom::with_panel();
        dom.set_style("play-btn", "border-color", "red");
        assert_eq!(dom.style("play-btn", "border-color"), Some("red"));
        dom.set_style("play-btn", "border-color", "");
        assert_eq!(dom.style("play-btn", "border-color"), None);
    }

    #[test]
    fn body_cannot_be_removed() {
        let mut dom = MemoryDom::new();
        dom.remove(BODY);
        assert!(dom.exists(BODY));
    }

    #[test]
    fn rect_center() {
        assert_eq!(Rect::new(10.0, 20.0, 40.0, 10.0).center(), Vec2::new(30.0, 25.0));
    }
}
