use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Window};

use crate::scroll::ScrollHost;

/// The page as seen by the scroll proxy: the window, the body whose height
/// sizes the native scrollbar, the translated content layer and its parent.
pub struct DomScrollHost {
    window: Window,
    document: Document,
    content: HtmlElement,
    viewport: HtmlElement,
}

impl DomScrollHost {
    pub fn new(content: HtmlElement) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let viewport = content
            .parent_element()
            .ok_or("content element has no parent")?
            .dyn_into::<HtmlElement>()?;
        Ok(Self {
            window,
            document,
            content,
            viewport,
        })
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }
}

const PINNED_VIEWPORT: [(&str, &str); 8] = [
    ("overflow", "hidden"),
    ("position", "fixed"),
    ("height", "100%"),
    ("width", "100%"),
    ("top", "0"),
    ("left", "0"),
    ("right", "0"),
    ("bottom", "0"),
];

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = el.style().set_property(property, value) {
        warn!(property, value, ?err, "style write failed");
    }
}

fn clear_style(el: &HtmlElement, property: &str) {
    if let Err(err) = el.style().remove_property(property) {
        warn!(property, ?err, "style removal failed");
    }
}

impl ScrollHost for DomScrollHost {
    fn viewport_size(&self) -> (f64, f64) {
        if let Some(root) = self.document.document_element() {
            return (root.client_width() as f64, root.client_height() as f64);
        }
        let w = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let h = self.window.inner_height().ok().and_then(|v| v.as_f64());
        (w.unwrap_or(0.0), h.unwrap_or(0.0))
    }

    fn native_scroll_top(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn set_native_scroll_top(&mut self, value: f64) {
        self.window.scroll_to_with_x_and_y(0.0, value);
    }

    fn document_height(&self) -> f64 {
        self.body().map(|b| b.scroll_height() as f64).unwrap_or(0.0)
    }

    fn set_document_height(&mut self, height: f64) {
        if let Some(body) = self.body() {
            set_style(&body, "height", &format!("{height}px"));
        }
    }

    fn content_height(&self) -> f64 {
        self.content.client_height() as f64
    }

    fn translate_content(&mut self, offset_px: f64) {
        set_style(
            &self.content,
            "transform",
            &format!("translate3d(0px, {offset_px}px, 0px)"),
        );
    }

    fn force_content_overflow_visible(&mut self) {
        set_style(&self.content, "overflow", "visible");
    }

    fn pin_viewport(&mut self) {
        for (property, value) in PINNED_VIEWPORT {
            set_style(&self.viewport, property, value);
        }
        set_style(&self.content, "width", "100%");
    }

    fn release_viewport(&mut self) {
        for (property, _) in PINNED_VIEWPORT {
            clear_style(&self.viewport, property);
        }
        for property in ["width", "overflow", "transform"] {
            clear_style(&self.content, property);
        }
        if let Some(body) = self.body() {
            clear_style(&body, "height");
        }
    }
}
