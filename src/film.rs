//! A frame film session: loading, virtual scrolling, smoothing and drawing
//! wired together.

use tracing::{debug, info, warn};

use crate::animation::AnimationState;
use crate::config::{FilmConfig, FrameDriving};
use crate::error::FilmResult;
use crate::frames::{AssetLoader, FrameStore, LoadGate};
use crate::layout::{LayoutMonitor, SubscriptionId};
use crate::scroll::{ScrollHost, ScrollProxy};
use crate::smoothing::SmoothingDriver;
use crate::surface::{Renderer, Surface};

pub struct Film<S: Surface, H> {
    store: FrameStore<S::Image>,
    animation: AnimationState,
    renderer: Renderer<S>,
    proxy: ScrollProxy<H>,
    smoothing: SmoothingDriver,
    layout: LayoutMonitor,
    driving: FrameDriving,
}

impl<S: Surface, H: ScrollHost> Film<S, H> {
    pub fn new(config: FilmConfig, surface: S, host: H) -> FilmResult<Self> {
        config.validate()?;
        let FilmConfig {
            frame_count,
            locator,
            smoothing,
            ready_policy,
            driving,
        } = config;
        let store = FrameStore::new(frame_count, |i| locator(i), ready_policy)?;
        Ok(Self {
            store,
            animation: AnimationState::new(frame_count),
            renderer: Renderer::new(surface),
            proxy: ScrollProxy::new(host),
            smoothing: SmoothingDriver::new(smoothing.effective_factor()),
            layout: LayoutMonitor::new(),
            driving,
        })
    }

    pub fn load(&mut self, loader: &mut impl AssetLoader) -> LoadGate {
        self.store.load(loader)
    }

    /// Feeds a decoded frame in. On the transition to `Ready` the first frame
    /// is drawn and the virtual scroll layer is installed; a failed draw is
    /// logged and does not hold back the scroll layer.
    pub fn asset_loaded(&mut self, index: usize, image: S::Image) -> FilmResult<Option<LoadGate>> {
        let transition = self.store.complete(index, image)?;
        if transition == Some(LoadGate::Ready) {
            self.on_ready();
        } else if self.is_ready() && index == self.animation.frame_index() {
            // The gate may open before the visible frame arrived.
            self.repaint()?;
        }
        Ok(transition)
    }

    pub fn asset_failed(&mut self, index: usize, reason: impl Into<String>) -> FilmResult<Option<LoadGate>> {
        self.store.fail(index, reason)
    }

    fn on_ready(&mut self) {
        self.animation.set_frame(0);
        if let Err(err) = self.repaint_or_skip() {
            warn!(%err, "first frame draw failed");
        }
        self.proxy.install();
        let range = self.layout.refresh(&mut self.proxy, &mut self.smoothing);
        info!(range, "scroll layer installed");
    }

    /// Ready and not torn down.
    fn is_live(&self) -> bool {
        self.is_ready() && self.proxy.is_installed()
    }

    /// Native scroll input. Ignored until the film is ready and after
    /// teardown.
    pub fn native_scroll(&mut self, scroll_top: f64, now_ms: f64) {
        if !self.is_live() {
            return;
        }
        let range = self.layout.usable_range();
        self.smoothing
            .on_native_scroll(scroll_top, range, now_ms, &mut self.proxy);
    }

    /// Forces the scroll position without smoothing (snapping and the like).
    ///
    /// The value lands as written, then settles into `[0, usable_range]`
    /// like any native scroll, so reading back an out-of-range write gives
    /// the nearest end of the range.
    pub fn write_scroll(&mut self, value: f64, now_ms: f64) {
        if !self.is_live() {
            return;
        }
        self.proxy.write(value);
        self.native_scroll(value, now_ms);
    }

    /// Viewport resize. Returns the new usable range.
    pub fn resize(&mut self) -> f64 {
        if !self.is_live() {
            return self.layout.usable_range();
        }
        self.layout.refresh(&mut self.proxy, &mut self.smoothing)
    }

    /// One animation frame: advances smoothing and, when driven internally,
    /// maps the scroll progress to a frame and repaints when it changed.
    /// Returns whether smoothing is still in motion.
    pub fn tick(&mut self, now_ms: f64) -> FilmResult<bool> {
        if !self.is_live() {
            return Ok(false);
        }
        self.layout.after_frame(&mut self.proxy);
        let moving = self.smoothing.tick(now_ms, &mut self.proxy);

        let progress = self.progress();
        let next = match &mut self.driving {
            FrameDriving::Internal(driver) => driver(progress, &self.animation),
            FrameDriving::External => return Ok(moving),
        };
        if self.set_frame(next) {
            self.repaint_or_skip()?;
        }
        Ok(moving)
    }

    fn repaint_or_skip(&mut self) -> FilmResult<()> {
        match self.repaint() {
            Err(err) if err.is_skippable() => {
                debug!(%err, "draw skipped");
                Ok(())
            }
            other => other,
        }
    }

    /// Scroll progress in `[0, 1]` over the usable range.
    pub fn progress(&self) -> f64 {
        let range = self.layout.usable_range();
        if range <= 0.0 {
            return 0.0;
        }
        (self.proxy.read() / range).clamp(0.0, 1.0)
    }

    /// Sets the frame for external drivers; follow with [`Film::repaint`].
    /// Under internal driving the next tick overrides it, see
    /// [`Film::drive_externally`].
    pub fn set_frame(&mut self, index: usize) -> bool {
        self.animation.set_frame(index)
    }

    /// Stops ticks from choosing the frame. There is no way back.
    pub fn drive_externally(&mut self) {
        if !self.driving.is_external() {
            debug!("frame selection handed to an external driver");
            self.driving = FrameDriving::External;
        }
    }

    pub fn driving(&self) -> &FrameDriving {
        &self.driving
    }

    pub fn repaint(&mut self) -> FilmResult<()> {
        self.renderer
            .draw(&self.store, self.animation.frame_index())
    }

    /// Called with the usable range after every re-measure.
    pub fn subscribe_refresh(&mut self, hook: impl FnMut(f64) + 'static) -> SubscriptionId {
        self.layout.subscribe(hook)
    }

    pub fn unsubscribe_refresh(&mut self, id: SubscriptionId) -> bool {
        self.layout.unsubscribe(id)
    }

    /// Drops refresh subscriptions and any live tween, then hands the page
    /// back to native scrolling. Input and ticks are ignored afterwards.
    pub fn teardown(&mut self) {
        self.layout.clear();
        self.smoothing.force_complete(&mut self.proxy, None);
        self.proxy.uninstall();
        info!("film torn down");
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    pub fn gate(&self) -> LoadGate {
        self.store.gate()
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn store(&self) -> &FrameStore<S::Image> {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn proxy(&self) -> &ScrollProxy<H> {
        &self.proxy
    }

    pub fn smoothing(&self) -> &SmoothingDriver {
        &self.smoothing
    }

    pub fn usable_range(&self) -> f64 {
        self.layout.usable_range()
    }
}
