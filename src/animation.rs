/// The frame currently shown by the film. `frame_index` always stays within
/// `[0, frame_count)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationState {
    frame_index: usize,
    frame_count: usize,
}

impl AnimationState {
    /// `frame_count` is floored at 1 so the index bound always exists.
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_index: 0,
            frame_count: frame_count.max(1),
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Clamps out-of-range requests to the last frame. Returns whether the
    /// visible frame changed.
    pub fn set_frame(&mut self, index: usize) -> bool {
        let next = index.min(self.frame_count - 1);
        let changed = next != self.frame_index;
        self.frame_index = next;
        changed
    }
}

/// Maps scroll progress in `[0, 1]` to a frame index.
pub type FrameDriver = Box<dyn FnMut(f64, &AnimationState) -> usize>;

/// Linear mapping from progress to frame, snapped to the nearest frame.
pub fn snapped_frame(progress: f64, state: &AnimationState) -> usize {
    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let last = (state.frame_count() - 1) as f64;
    (progress * last).round() as usize
}

pub fn default_driver() -> FrameDriver {
    Box::new(snapped_frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_frame_clamps_to_last() {
        let mut s = AnimationState::new(100);
        assert!(s.set_frame(250));
        assert_eq!(s.frame_index(), 99);
        assert!(!s.set_frame(99));
    }

    #[test]
    fn snapped_frame_covers_endpoints() {
        let s = AnimationState::new(100);
        assert_eq!(snapped_frame(0.0, &s), 0);
        assert_eq!(snapped_frame(1.0, &s), 99);
        assert_eq!(snapped_frame(0.5, &s), 50);
        assert_eq!(snapped_frame(-3.0, &s), 0);
        assert_eq!(snapped_frame(f64::NAN, &s), 0);
        assert_eq!(snapped_frame(7.0, &s), 99);
    }

    #[test]
    fn single_frame_film_never_moves() {
        let mut s = AnimationState::new(1);
        assert_eq!(snapped_frame(0.7, &s), 0);
        assert!(!s.set_frame(3));
    }
}
