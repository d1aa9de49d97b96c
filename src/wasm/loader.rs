use std::cell::RefCell;
use std::rc::Weak;

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::HtmlImageElement;

use super::session::WebFilm;
use crate::frames::{AssetLoader, LoadGate};

struct PendingImage {
    image: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl Drop for PendingImage {
    fn drop(&mut self) {
        // Detach before the closures go away so a late event finds nothing.
        self.image.set_onload(None);
        self.image.set_onerror(None);
    }
}

/// Decodes frames through `<img>` elements, reporting back into the film.
pub struct ImageLoader {
    film: Weak<RefCell<WebFilm>>,
    on_gate: Option<Function>,
    pending: Vec<PendingImage>,
}

impl ImageLoader {
    pub fn new(film: Weak<RefCell<WebFilm>>, on_gate: Option<Function>) -> Self {
        Self {
            film,
            on_gate,
            pending: Vec::new(),
        }
    }
}

fn notify(on_gate: &Option<Function>, gate: LoadGate) {
    if let Some(callback) = on_gate {
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(gate.as_str())) {
            warn!(?err, "gate callback threw");
        }
    }
}

impl AssetLoader for ImageLoader {
    fn request(&mut self, index: usize, locator: &str) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                warn!(index, ?err, "could not create image element");
                return;
            }
        };

        let onload = {
            let film = self.film.clone();
            let on_gate = self.on_gate.clone();
            let decoded = image.clone();
            Closure::wrap(Box::new(move || {
                let Some(film) = film.upgrade() else {
                    return;
                };
                // The borrow ends before the host callback runs.
                let result = film.borrow_mut().asset_loaded(index, decoded.clone());
                match result {
                    Ok(Some(gate)) => notify(&on_gate, gate),
                    Ok(None) => {}
                    Err(err) => warn!(index, %err, "frame completion failed"),
                }
            }) as Box<dyn FnMut()>)
        };

        let onerror = {
            let film = self.film.clone();
            let on_gate = self.on_gate.clone();
            let locator = locator.to_string();
            Closure::wrap(Box::new(move || {
                let Some(film) = film.upgrade() else {
                    return;
                };
                let reason = format!("could not load {locator}");
                let result = film.borrow_mut().asset_failed(index, reason);
                match result {
                    Ok(Some(gate)) => notify(&on_gate, gate),
                    Ok(None) => {}
                    Err(err) => warn!(index, %err, "frame failure report failed"),
                }
            }) as Box<dyn FnMut()>)
        };

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        image.set_src(locator);

        self.pending.push(PendingImage {
            image,
            _onload: onload,
            _onerror: onerror,
        });
    }
}
