use std::fmt;
use std::rc::Rc;

use crate::animation::{default_driver, AnimationState, FrameDriver};
use crate::error::{FilmError, FilmResult};
use crate::frames::ReadyPolicy;

pub type Locator = Rc<dyn Fn(usize) -> String>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingConfig {
    pub enabled: bool,
    /// Seconds the content takes to catch up with the scroll position.
    pub factor_secs: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            factor_secs: 2.0,
        }
    }
}

impl SmoothingConfig {
    /// Catch-up time actually applied; disabled smoothing tracks instantly.
    pub fn effective_factor(&self) -> f64 {
        if self.enabled {
            self.factor_secs
        } else {
            0.0
        }
    }
}

/// Who picks the visible frame.
pub enum FrameDriving {
    /// Every tick maps scroll progress to a frame.
    Internal(FrameDriver),
    /// Something else calls `set_frame` and `repaint`; ticks only smooth.
    External,
}

impl Default for FrameDriving {
    fn default() -> Self {
        FrameDriving::Internal(default_driver())
    }
}

impl FrameDriving {
    pub fn is_external(&self) -> bool {
        matches!(self, FrameDriving::External)
    }
}

impl fmt::Debug for FrameDriving {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDriving::Internal(_) => f.write_str("Internal"),
            FrameDriving::External => f.write_str("External"),
        }
    }
}

pub struct FilmConfig {
    pub frame_count: usize,
    pub locator: Locator,
    pub smoothing: SmoothingConfig,
    pub ready_policy: ReadyPolicy,
    /// Internal snapped linear mapping unless told otherwise.
    pub driving: FrameDriving,
}

impl FilmConfig {
    pub fn new(frame_count: usize, locator: impl Fn(usize) -> String + 'static) -> Self {
        Self {
            frame_count,
            locator: Rc::new(locator),
            smoothing: SmoothingConfig::default(),
            ready_policy: ReadyPolicy::default(),
            driving: FrameDriving::default(),
        }
    }

    pub fn with_smoothing(mut self, factor_secs: f64) -> Self {
        self.smoothing = SmoothingConfig {
            enabled: true,
            factor_secs,
        };
        self
    }

    pub fn without_smoothing(mut self) -> Self {
        self.smoothing.enabled = false;
        self
    }

    pub fn ready_when(mut self, policy: ReadyPolicy) -> Self {
        self.ready_policy = policy;
        self
    }

    pub fn with_driver(
        mut self,
        driver: impl FnMut(f64, &AnimationState) -> usize + 'static,
    ) -> Self {
        self.driving = FrameDriving::Internal(Box::new(driver));
        self
    }

    /// Leaves frame selection to the caller; ticks never touch the frame.
    pub fn externally_driven(mut self) -> Self {
        self.driving = FrameDriving::External;
        self
    }

    pub fn validate(&self) -> FilmResult<()> {
        if self.frame_count == 0 {
            return Err(FilmError::invalid_config("frame count must be positive"));
        }
        let factor = self.smoothing.factor_secs;
        if !factor.is_finite() || factor < 0.0 {
            return Err(FilmError::invalid_config(format!(
                "smoothing factor must be a non-negative number, got {factor}"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for FilmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilmConfig")
            .field("frame_count", &self.frame_count)
            .field("smoothing", &self.smoothing)
            .field("ready_policy", &self.ready_policy)
            .field("driving", &self.driving)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_film() {
        let c = FilmConfig::new(100, |i| format!("./churchSequence/{}.jpg", i + 1));
        assert!(c.smoothing.enabled);
        assert_eq!(c.smoothing.factor_secs, 2.0);
        assert_eq!(c.ready_policy, ReadyPolicy::LastConstructed);
        assert_eq!((c.locator)(0), "./churchSequence/1.jpg");
        assert!(!c.driving.is_external());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(FilmConfig::new(0, |i| i.to_string()).validate().is_err());
        assert!(FilmConfig::new(3, |i| i.to_string())
            .with_smoothing(-1.0)
            .validate()
            .is_err());
        assert!(FilmConfig::new(3, |i| i.to_string())
            .with_smoothing(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn external_driving_replaces_any_mapping() {
        let c = FilmConfig::new(3, |i| i.to_string())
            .with_driver(|_, _| 2)
            .externally_driven();
        assert!(c.driving.is_external());
        assert!(format!("{c:?}").contains("External"));
    }

    #[test]
    fn disabled_smoothing_is_instant() {
        let c = FilmConfig::new(3, |i| i.to_string()).without_smoothing();
        assert_eq!(c.smoothing.effective_factor(), 0.0);
    }
}
