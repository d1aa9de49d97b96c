//! Virtual scroll proxy.
//!
//! The page never scrolls natively. The content layer is translated instead
//! and every consumer reads the scroll position from [`ScrollProxy`].

use tracing::debug;

/// Page-side operations the proxy and layout monitor need.
pub trait ScrollHost {
    /// `(width, height)` of the visible viewport.
    fn viewport_size(&self) -> (f64, f64);
    fn native_scroll_top(&self) -> f64;
    fn set_native_scroll_top(&mut self, value: f64);
    fn document_height(&self) -> f64;
    fn set_document_height(&mut self, height: f64);
    /// Natural (untransformed) height of the content layer.
    fn content_height(&self) -> f64;
    fn translate_content(&mut self, offset_px: f64);
    fn force_content_overflow_visible(&mut self);
    /// Fixes the content's parent to the viewport with hidden overflow.
    fn pin_viewport(&mut self);
    /// Undoes [`ScrollHost::pin_viewport`], the content transform and the
    /// document height so the page scrolls natively again.
    fn release_viewport(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollVirtualState {
    pub content_offset_px: f64,
    pub content_height_px: f64,
    pub is_programmatic_scroll: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

pub struct ScrollProxy<H> {
    host: H,
    state: ScrollVirtualState,
    installed: bool,
}

impl<H: ScrollHost> ScrollProxy<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: ScrollVirtualState::default(),
            installed: false,
        }
    }

    /// Takes over the page: pins the viewport and lets the content overflow.
    pub fn install(&mut self) {
        if self.installed {
            return;
        }
        self.host.pin_viewport();
        self.host.force_content_overflow_visible();
        self.host.translate_content(self.state.content_offset_px);
        self.installed = true;
    }

    /// Hands the page back to native scrolling. The virtual state is kept.
    pub fn uninstall(&mut self) {
        if !self.installed {
            return;
        }
        self.host.release_viewport();
        self.installed = false;
        debug!("scroll layer removed");
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Scroll distance; positive when the content has moved up.
    pub fn read(&self) -> f64 {
        -self.state.content_offset_px
    }

    /// Forces the scroll position. Applies instantly and flags the write so
    /// the smoothing driver does not animate toward it.
    pub fn write(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.set_offset(-value);
        self.state.is_programmatic_scroll = true;
        self.host.set_native_scroll_top(value);
        debug!(value, "programmatic scroll");
    }

    /// Moves the content layer. The only path that mutates the offset.
    pub fn set_offset(&mut self, offset_px: f64) {
        self.state.content_offset_px = offset_px;
        self.host.translate_content(offset_px);
    }

    pub fn offset(&self) -> f64 {
        self.state.content_offset_px
    }

    pub fn set_content_height(&mut self, height_px: f64) {
        self.state.content_height_px = height_px;
    }

    pub fn content_height(&self) -> f64 {
        self.state.content_height_px
    }

    pub fn is_programmatic(&self) -> bool {
        self.state.is_programmatic_scroll
    }

    pub fn clear_programmatic(&mut self) {
        self.state.is_programmatic_scroll = false;
    }

    pub fn reported_height(&self) -> f64 {
        self.host.document_height()
    }

    /// The proxy always claims to cover exactly the viewport.
    pub fn bounding_box(&self) -> Rect {
        let (width, height) = self.host.viewport_size();
        Rect {
            top: 0.0,
            left: 0.0,
            width,
            height,
        }
    }

    pub fn state(&self) -> &ScrollVirtualState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
