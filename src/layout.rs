//! Layout monitor: keeps the virtual scroll height in step with the content.

use tracing::debug;

use crate::scroll::{ScrollHost, ScrollProxy};
use crate::smoothing::SmoothingDriver;

/// Handle returned by [`LayoutMonitor::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type RefreshHook = Box<dyn FnMut(f64)>;

#[derive(Default)]
pub struct LayoutMonitor {
    hooks: Vec<(SubscriptionId, RefreshHook)>,
    next_id: u64,
    usable_range: f64,
    refreshes: u64,
    overflow_pending: bool,
}

impl LayoutMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-measures the content and returns the usable scroll range
    /// (`content height - viewport height`).
    ///
    /// Any running smoothing tween is force-completed to the position the
    /// native scroll maps to under the new range.
    pub fn refresh<H: ScrollHost>(
        &mut self,
        proxy: &mut ScrollProxy<H>,
        smoothing: &mut SmoothingDriver,
    ) -> f64 {
        let host = proxy.host_mut();
        host.force_content_overflow_visible();
        let height = host.content_height().max(0.0);
        host.set_document_height(height);
        let (_, viewport_height) = host.viewport_size();
        let scroll_top = host.native_scroll_top();
        proxy.set_content_height(height);

        let range = height - viewport_height;
        self.usable_range = range;
        self.refreshes += 1;
        self.overflow_pending = true;

        let target = -scroll_top.clamp(0.0, range.max(0.0));
        smoothing.force_complete(proxy, Some(target));
        debug!(height, range, "layout refreshed");

        for (_, hook) in &mut self.hooks {
            hook(range);
        }
        range
    }

    /// Reasserts the overflow state one animation frame after a refresh,
    /// after the layout engine has had a chance to cache a stale value.
    pub fn after_frame<H: ScrollHost>(&mut self, proxy: &mut ScrollProxy<H>) {
        if std::mem::take(&mut self.overflow_pending) {
            proxy.host_mut().force_content_overflow_visible();
        }
    }

    pub fn subscribe(&mut self, hook: impl FnMut(f64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.hooks.push((id, Box::new(hook)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(hook_id, _)| *hook_id != id);
        self.hooks.len() != before
    }

    pub fn clear(&mut self) {
        self.hooks.clear();
    }

    pub fn usable_range(&self) -> f64 {
        self.usable_range
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
