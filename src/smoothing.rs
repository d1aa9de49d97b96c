//! Smoothing driver: eases the content offset toward the native scroll
//! target, one tween at a time.

use tracing::debug;

use crate::scroll::{ScrollHost, ScrollProxy};

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start_ms: f64,
    duration_ms: f64,
}

impl Tween {
    fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1.0),
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    fn is_done(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }

    fn sample(&self, now_ms: f64) -> f64 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_out_cubic(t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Animating(Tween),
    /// Transient: only observable while a snap is being applied.
    ForceCompleting,
}

pub struct SmoothingDriver {
    duration_ms: f64,
    phase: Phase,
}

impl SmoothingDriver {
    /// `factor_secs` is the catch-up time; 0 tracks the target instantly.
    pub fn new(factor_secs: f64) -> Self {
        let factor_secs = if factor_secs.is_finite() {
            factor_secs.max(0.0)
        } else {
            0.0
        };
        Self {
            duration_ms: factor_secs * 1000.0,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating(_))
    }

    /// Starts a tween toward `target`, replacing any live one.
    pub fn retarget<H: ScrollHost>(
        &mut self,
        target: f64,
        now_ms: f64,
        proxy: &mut ScrollProxy<H>,
    ) {
        if self.duration_ms <= 0.0 {
            proxy.set_offset(target);
            self.phase = Phase::Idle;
            return;
        }
        let from = match self.phase {
            Phase::Animating(tween) => {
                if tween.to == target {
                    return;
                }
                tween.sample(now_ms)
            }
            _ => proxy.offset(),
        };
        if from == target {
            self.phase = Phase::Idle;
            return;
        }
        self.phase = Phase::Animating(Tween::new(from, target, now_ms, self.duration_ms));
    }

    /// Reacts to the page's native scroll position. `range` is the usable
    /// travel reported by the layout monitor.
    pub fn on_native_scroll<H: ScrollHost>(
        &mut self,
        scroll_top: f64,
        range: f64,
        now_ms: f64,
        proxy: &mut ScrollProxy<H>,
    ) {
        let target = -scroll_top.clamp(0.0, range.max(0.0));
        if proxy.is_programmatic() {
            self.force_complete(proxy, Some(target));
            proxy.clear_programmatic();
            return;
        }
        self.retarget(target, now_ms, proxy);
    }

    /// Advances the live tween. Returns whether a tween is still running.
    pub fn tick<H: ScrollHost>(&mut self, now_ms: f64, proxy: &mut ScrollProxy<H>) -> bool {
        if proxy.is_programmatic() {
            let target = proxy.offset();
            self.force_complete(proxy, Some(target));
            proxy.clear_programmatic();
            return false;
        }
        let Phase::Animating(tween) = self.phase else {
            return false;
        };
        proxy.set_offset(tween.sample(now_ms));
        if tween.is_done(now_ms) {
            self.phase = Phase::Idle;
            return false;
        }
        true
    }

    /// Kills the live tween and jumps to `target`, or to the tween's own
    /// target when none is given. Calling it again is a no-op.
    pub fn force_complete<H: ScrollHost>(&mut self, proxy: &mut ScrollProxy<H>, target: Option<f64>) {
        let previous = std::mem::replace(&mut self.phase, Phase::ForceCompleting);
        let snap = target.or(match previous {
            Phase::Animating(tween) => Some(tween.target()),
            _ => None,
        });
        if let Some(offset) = snap {
            if offset != proxy.offset() {
                proxy.set_offset(offset);
            }
            debug!(offset, "smoothing force-completed");
        }
        self.phase = Phase::Idle;
    }
}
