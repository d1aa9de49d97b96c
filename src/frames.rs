//! Frame store: the ordered set of frame assets and the readiness gate.
//!
//! Every asset is requested once, in index order, with no concurrency cap.
//! Completions arrive in any order and only touch their own asset; the gate
//! is the single piece of cross-asset state.

use tracing::{debug, info, warn};

use crate::error::{FilmError, FilmResult};

/// Whole-set readiness. Leaves `Pending` at most once and never goes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadGate {
    Pending,
    Ready,
    Failed,
}

impl LoadGate {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

/// When the gate opens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadyPolicy {
    /// Ready as soon as the last-constructed asset (index `frame_count - 1`)
    /// completes. Earlier assets may still be pending at that point.
    #[default]
    LastConstructed,
    /// Ready once every asset has completed.
    AllLoaded,
}

/// Issues decode requests on behalf of the store.
pub trait AssetLoader {
    fn request(&mut self, index: usize, locator: &str);
}

#[derive(Debug)]
pub struct FrameAsset<I> {
    index: usize,
    locator: String,
    image: Option<I>,
    failure: Option<String>,
    requested: bool,
}

impl<I> FrameAsset<I> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

#[derive(Debug)]
pub struct FrameStore<I> {
    assets: Vec<FrameAsset<I>>,
    policy: ReadyPolicy,
    gate: LoadGate,
    loaded: usize,
    failed: usize,
}

impl<I> FrameStore<I> {
    pub fn new(
        frame_count: usize,
        locator: impl Fn(usize) -> String,
        policy: ReadyPolicy,
    ) -> FilmResult<Self> {
        if frame_count == 0 {
            return Err(FilmError::invalid_config("frame count must be positive"));
        }
        let assets = (0..frame_count)
            .map(|index| FrameAsset {
                index,
                locator: locator(index),
                image: None,
                failure: None,
                requested: false,
            })
            .collect();
        Ok(Self {
            assets,
            policy,
            gate: LoadGate::Pending,
            loaded: 0,
            failed: 0,
        })
    }

    /// Requests every asset that has not been requested yet.
    pub fn load(&mut self, loader: &mut impl AssetLoader) -> LoadGate {
        let mut issued = 0usize;
        for asset in self.assets.iter_mut().filter(|a| !a.requested) {
            asset.requested = true;
            loader.request(asset.index, &asset.locator);
            issued += 1;
        }
        debug!(issued, frame_count = self.assets.len(), "issued frame requests");
        self.gate
    }

    /// Records a decoded frame. Returns the new gate on the one transition
    /// to `Ready`, `None` otherwise.
    pub fn complete(&mut self, index: usize, image: I) -> FilmResult<Option<LoadGate>> {
        let frame_count = self.assets.len();
        let asset = self
            .assets
            .get_mut(index)
            .ok_or(FilmError::OutOfRangeFrameIndex { index, frame_count })?;
        if asset.image.is_some() {
            warn!(index, "duplicate completion ignored");
            return Ok(None);
        }
        asset.image = Some(image);
        self.loaded += 1;

        if self.gate != LoadGate::Pending {
            return Ok(None);
        }
        let opens = match self.policy {
            ReadyPolicy::LastConstructed => index + 1 == frame_count,
            ReadyPolicy::AllLoaded => self.loaded == frame_count,
        };
        if !opens {
            return Ok(None);
        }
        if self.loaded < frame_count {
            warn!(
                loaded = self.loaded,
                frame_count, "gate opened with frames still pending"
            );
        }
        info!(frame_count, "frame set ready");
        self.gate = LoadGate::Ready;
        Ok(Some(LoadGate::Ready))
    }

    /// Records a load failure. Returns `Some(Failed)` when the failure makes
    /// the gate unreachable under the current policy.
    pub fn fail(&mut self, index: usize, reason: impl Into<String>) -> FilmResult<Option<LoadGate>> {
        let frame_count = self.assets.len();
        let asset = self
            .assets
            .get_mut(index)
            .ok_or(FilmError::OutOfRangeFrameIndex { index, frame_count })?;
        if asset.image.is_some() || asset.failure.is_some() {
            return Ok(None);
        }
        let reason = reason.into();
        warn!(
            "{}",
            FilmError::AssetLoadFailure {
                index,
                reason: reason.clone()
            }
        );
        asset.failure = Some(reason);
        self.failed += 1;

        if self.gate != LoadGate::Pending {
            return Ok(None);
        }
        let fatal = match self.policy {
            ReadyPolicy::LastConstructed => index + 1 == frame_count,
            ReadyPolicy::AllLoaded => true,
        };
        if !fatal {
            return Ok(None);
        }
        self.gate = LoadGate::Failed;
        Ok(Some(LoadGate::Failed))
    }

    pub fn frame_at(&self, index: usize) -> FilmResult<&I> {
        let frame_count = self.assets.len();
        self.assets
            .get(index)
            .ok_or(FilmError::OutOfRangeFrameIndex { index, frame_count })?
            .image
            .as_ref()
            .ok_or(FilmError::NotLoaded { index })
    }

    pub fn asset(&self, index: usize) -> Option<&FrameAsset<I>> {
        self.assets.get(index)
    }

    pub fn gate(&self) -> LoadGate {
        self.gate
    }

    pub fn is_ready(&self) -> bool {
        self.gate == LoadGate::Ready
    }

    pub fn policy(&self) -> ReadyPolicy {
        self.policy
    }

    pub fn frame_count(&self) -> usize {
        self.assets.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(usize, String)>);

    impl AssetLoader for Recorder {
        fn request(&mut self, index: usize, locator: &str) {
            self.0.push((index, locator.to_string()));
        }
    }

    fn store(count: usize, policy: ReadyPolicy) -> FrameStore<u32> {
        FrameStore::new(count, |i| format!("frame/{}.jpg", i + 1), policy).unwrap()
    }

    #[test]
    fn zero_frames_is_rejected() {
        let err = FrameStore::<u32>::new(0, |i| i.to_string(), ReadyPolicy::default()).unwrap_err();
        assert!(matches!(err, FilmError::InvalidConfig(_)));
    }

    #[test]
    fn load_requests_each_asset_once_in_order() {
        let mut s = store(3, ReadyPolicy::LastConstructed);
        let mut loader = Recorder::default();
        assert_eq!(s.load(&mut loader), LoadGate::Pending);
        assert_eq!(s.load(&mut loader), LoadGate::Pending);
        assert_eq!(
            loader.0,
            vec![
                (0, "frame/1.jpg".to_string()),
                (1, "frame/2.jpg".to_string()),
                (2, "frame/3.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn last_constructed_opens_before_earlier_frames() {
        let mut s = store(3, ReadyPolicy::LastConstructed);
        assert_eq!(s.complete(2, 7).unwrap(), Some(LoadGate::Ready));
        assert_eq!(s.frame_at(0), Err(FilmError::NotLoaded { index: 0 }));
        assert_eq!(s.complete(0, 1).unwrap(), None);
        assert_eq!(*s.frame_at(0).unwrap(), 1);
    }

    #[test]
    fn all_loaded_counts_completions() {
        let mut s = store(3, ReadyPolicy::AllLoaded);
        assert_eq!(s.complete(2, 0).unwrap(), None);
        assert_eq!(s.complete(0, 0).unwrap(), None);
        assert_eq!(s.complete(1, 0).unwrap(), Some(LoadGate::Ready));
    }

    #[test]
    fn duplicate_completion_keeps_first_image() {
        let mut s = store(2, ReadyPolicy::AllLoaded);
        s.complete(0, 10).unwrap();
        s.complete(0, 20).unwrap();
        assert_eq!(*s.frame_at(0).unwrap(), 10);
        assert_eq!(s.loaded_count(), 1);
    }

    #[test]
    fn failure_of_designated_asset_fails_gate() {
        let mut s = store(3, ReadyPolicy::LastConstructed);
        assert_eq!(s.fail(0, "404").unwrap(), None);
        assert_eq!(s.gate(), LoadGate::Pending);
        assert_eq!(s.fail(2, "decode").unwrap(), Some(LoadGate::Failed));
        assert_eq!(s.complete(2, 1).unwrap(), None);
        assert_eq!(s.gate(), LoadGate::Failed);
        assert_eq!(s.failed_count(), 2);
        assert_eq!(s.asset(0).unwrap().failure(), Some("404"));
    }

    #[test]
    fn any_failure_is_fatal_when_counting() {
        let mut s = store(3, ReadyPolicy::AllLoaded);
        assert_eq!(s.fail(1, "timeout").unwrap(), Some(LoadGate::Failed));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut s = store(2, ReadyPolicy::LastConstructed);
        assert_eq!(
            s.complete(5, 0),
            Err(FilmError::OutOfRangeFrameIndex {
                index: 5,
                frame_count: 2
            })
        );
        assert!(matches!(
            s.frame_at(2),
            Err(FilmError::OutOfRangeFrameIndex { .. })
        ));
    }
}
