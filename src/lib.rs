//! Scroll-scrubbed image sequences ("frame films") for the browser.
//!
//! The core modules are platform-neutral and drive everything through the
//! [`Surface`], [`ScrollHost`] and [`AssetLoader`] traits. The `wasm` module
//! binds them to a canvas and the page when compiling for `wasm32`.

pub mod animation;
pub mod config;
pub mod error;
pub mod film;
pub mod frames;
pub mod layout;
pub mod scroll;
pub mod smoothing;
pub mod surface;

pub use animation::{AnimationState, FrameDriver};
pub use config::{FilmConfig, FrameDriving, SmoothingConfig};
pub use error::{FilmError, FilmResult};
pub use film::Film;
pub use frames::{AssetLoader, FrameAsset, FrameStore, LoadGate, ReadyPolicy};
pub use layout::{LayoutMonitor, SubscriptionId};
pub use scroll::{Rect, ScrollHost, ScrollProxy, ScrollVirtualState};
pub use smoothing::{Phase, SmoothingDriver};
pub use surface::{FrameImage, Renderer, Surface};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod dom;
    mod loader;
    mod render;
    mod session;

    pub use session::FrameFilm;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        // `tracing` events reach the console through its `log` bridge.
        console_log::init_with_level(log::Level::Info).ok();
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::FrameFilm;
