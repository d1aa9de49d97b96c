use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use js_sys::Function;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

use super::dom::DomScrollHost;
use super::loader::ImageLoader;
use super::render::{CanvasSurface, FrameLoop};
use crate::animation::{snapped_frame, AnimationState};
use crate::config::FilmConfig;
use crate::error::FilmError;
use crate::film::Film;
use crate::layout::SubscriptionId;

pub type WebFilm = Film<CanvasSurface, DomScrollHost>;

impl From<FilmError> for JsValue {
    fn from(err: FilmError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn resolve_locators(locator: &Function, frame_count: usize) -> Result<Vec<String>, JsValue> {
    (0..frame_count)
        .map(|i| {
            locator
                .call1(&JsValue::NULL, &JsValue::from(i as u32))?
                .as_string()
                .ok_or_else(|| JsValue::from_str(&format!("locator returned a non-string for frame {i}")))
        })
        .collect()
}

/// Wraps a JS `(progress, frameCount) => frame` function. Anything that is
/// not a finite number falls back to the snapped linear mapping.
fn js_driver(driver: Function) -> impl FnMut(f64, &AnimationState) -> usize {
    move |progress: f64, state: &AnimationState| {
        driver
            .call2(
                &JsValue::NULL,
                &JsValue::from_f64(progress),
                &JsValue::from_f64(state.frame_count() as f64),
            )
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0).round() as usize)
            .unwrap_or_else(|| snapped_frame(progress, state))
    }
}

/// A scroll-scrubbed frame film bound to a canvas and a content element.
///
/// The content element's parent becomes the fixed viewport once the frames
/// are ready. Callbacks handed in here must not call back into the film.
#[wasm_bindgen]
pub struct FrameFilm {
    film: Rc<RefCell<WebFilm>>,
    loader: Option<ImageLoader>,
    listeners: Vec<EventListener>,
    frame_loop: Option<FrameLoop>,
    refresh_hooks: Vec<(u32, SubscriptionId)>,
    next_handle: u32,
}

#[wasm_bindgen]
impl FrameFilm {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        canvas: HtmlCanvasElement,
        content: HtmlElement,
        frame_count: u32,
        locator: &Function,
        smoothness: f64,
        smooth_enabled: bool,
        driver: Option<Function>,
        on_ready: Option<Function>,
    ) -> Result<FrameFilm, JsValue> {
        let frame_count = frame_count as usize;
        let locators = resolve_locators(locator, frame_count)?;
        let mut config = FilmConfig::new(frame_count, move |i| {
            locators.get(i).cloned().unwrap_or_default()
        })
        .with_smoothing(smoothness);
        if !smooth_enabled {
            config = config.without_smoothing();
        }
        if let Some(driver) = driver {
            config = config.with_driver(js_driver(driver));
        }

        let surface = CanvasSurface::new(canvas)?;
        let host = DomScrollHost::new(content)?;
        let film = Rc::new(RefCell::new(Film::new(config, surface, host)?));

        let mut loader = ImageLoader::new(Rc::downgrade(&film), on_ready);
        film.borrow_mut().load(&mut loader);

        let listeners = install_listeners(&film)?;
        let frame_loop = {
            let film = Rc::downgrade(&film);
            FrameLoop::start(move |now| {
                let Some(film) = film.upgrade() else {
                    return;
                };
                if let Err(err) = film.borrow_mut().tick(now) {
                    warn!(%err, "frame tick failed");
                }
            })
        };

        Ok(FrameFilm {
            film,
            loader: Some(loader),
            listeners,
            frame_loop: Some(frame_loop),
            refresh_hooks: Vec::new(),
            next_handle: 0,
        })
    }

    #[wasm_bindgen(js_name = scrollTop)]
    pub fn scroll_top(&self) -> f64 {
        self.film.borrow().proxy().read()
    }

    /// Jumps to `value` without smoothing. Values outside
    /// `[0, scrollHeight - viewport height]` settle at the nearest end, so
    /// `scrollTop` may read back less than was written.
    #[wasm_bindgen(js_name = setScrollTop)]
    pub fn set_scroll_top(&self, value: f64) {
        self.film.borrow_mut().write_scroll(value, now());
    }

    #[wasm_bindgen(js_name = scrollHeight)]
    pub fn scroll_height(&self) -> f64 {
        self.film.borrow().proxy().reported_height()
    }

    pub fn progress(&self) -> f64 {
        self.film.borrow().progress()
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.film.borrow().is_ready()
    }

    pub fn gate(&self) -> String {
        self.film.borrow().gate().as_str().to_string()
    }

    pub fn frame(&self) -> u32 {
        self.film.borrow().animation().frame_index() as u32
    }

    /// Stops the frame loop from picking frames so `setFrame` sticks.
    /// Smoothing keeps running.
    #[wasm_bindgen(js_name = useExternalDriver)]
    pub fn use_external_driver(&self) {
        self.film.borrow_mut().drive_externally();
    }

    /// For external drivers: set the frame, then call `repaint`. Without
    /// `useExternalDriver` the next animation frame overrides it.
    #[wasm_bindgen(js_name = setFrame)]
    pub fn set_frame(&self, index: u32) -> bool {
        self.film.borrow_mut().set_frame(index as usize)
    }

    pub fn repaint(&self) -> Result<(), JsValue> {
        self.film.borrow_mut().repaint()?;
        Ok(())
    }

    /// Re-measures the content; returns the usable scroll range.
    pub fn refresh(&self) -> f64 {
        self.film.borrow_mut().resize()
    }

    /// Calls `hook(range)` after every re-measure; returns a handle for
    /// `offRefresh`. The hook must not call back into the film.
    #[wasm_bindgen(js_name = onRefresh)]
    pub fn on_refresh(&mut self, hook: Function) -> u32 {
        let id = self.film.borrow_mut().subscribe_refresh(move |range| {
            if let Err(err) = hook.call1(&JsValue::NULL, &JsValue::from_f64(range)) {
                warn!(?err, "refresh hook threw");
            }
        });
        let handle = self.next_handle;
        self.next_handle += 1;
        self.refresh_hooks.push((handle, id));
        handle
    }

    #[wasm_bindgen(js_name = offRefresh)]
    pub fn off_refresh(&mut self, handle: u32) -> bool {
        let Some(pos) = self.refresh_hooks.iter().position(|(h, _)| *h == handle) else {
            return false;
        };
        let (_, id) = self.refresh_hooks.swap_remove(pos);
        self.film.borrow_mut().unsubscribe_refresh(id)
    }

    /// Removes listeners, stops the frame loop, detaches pending loads and
    /// restores native page scrolling.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.frame_loop = None;
        self.loader = None;
        self.refresh_hooks.clear();
        self.film.borrow_mut().teardown();
    }
}

fn install_listeners(film: &Rc<RefCell<WebFilm>>) -> Result<Vec<EventListener>, JsValue> {
    let window = web_sys::window().ok_or("no window")?;

    let on_scroll = {
        let film = Rc::downgrade(film);
        let win = window.clone();
        EventListener::new(&window, "scroll", move |_event| {
            let Some(film) = film.upgrade() else {
                return;
            };
            let top = win.scroll_y().unwrap_or(0.0);
            film.borrow_mut().native_scroll(top, now());
        })
    };

    let on_resize = {
        let film = Rc::downgrade(film);
        EventListener::new(&window, "resize", move |_event| {
            if let Some(film) = film.upgrade() {
                film.borrow_mut().resize();
            }
        })
    };

    Ok(vec![on_scroll, on_resize])
}
