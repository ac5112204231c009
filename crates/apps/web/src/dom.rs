use panel::{BODY, Dom, Rect};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// The live document, addressed by element id.
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<Element> {
        if id == BODY {
            self.document.body().map(Into::into)
        } else {
            self.document.get_element_by_id(id)
        }
    }
}

impl Dom for WebDom {
    fn exists(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn add_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.element(id) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.element(id) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) {
        let Some(el) = self.element(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let style = el.style();
        let _ = if value.is_empty() {
            style.remove_property(property).map(drop)
        } else {
            style.set_property(property, value)
        };
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn rect(&self, id: &str) -> Option<Rect> {
        let r = self.element(id)?.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
    }
}
