pub type FilmResult<T> = Result<T, FilmError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FilmError {
    #[error("asset load failure: frame {index}: {reason}")]
    AssetLoadFailure { index: usize, reason: String },

    #[error("frame {index} is not loaded")]
    NotLoaded { index: usize },

    #[error("frame {index} is unavailable for drawing")]
    FrameUnavailable { index: usize },

    #[error("frame index {index} out of range (frame count {frame_count})")]
    OutOfRangeFrameIndex { index: usize, frame_count: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("host error: {0}")]
    Host(String),
}

impl FilmError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Errors a caller can recover from by skipping the current draw.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::FrameUnavailable { .. } | Self::NotLoaded { .. })
    }
}
