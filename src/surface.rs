//! Single-frame drawing onto an output surface.

use tracing::debug;

use crate::error::{FilmError, FilmResult};
use crate::frames::FrameStore;

/// A decoded frame with a fixed native resolution.
pub trait FrameImage {
    fn dimensions(&self) -> (u32, u32);
}

/// A 2D drawing target.
pub trait Surface {
    type Image: FrameImage;

    fn size(&self) -> (u32, u32);
    fn set_size(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64) -> FilmResult<()>;
}

pub struct Renderer<S> {
    surface: S,
    draws: u64,
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, draws: 0 }
    }

    /// Matches the surface to the frame's native size; the sequence is drawn
    /// unscaled.
    pub fn resize_to_frame(&mut self, image: &S::Image) {
        let dims = image.dimensions();
        if self.surface.size() != dims {
            self.surface.set_size(dims.0, dims.1);
        }
    }

    pub fn draw(&mut self, store: &FrameStore<S::Image>, frame_index: usize) -> FilmResult<()> {
        let image = store.frame_at(frame_index).map_err(|err| match err {
            FilmError::NotLoaded { index } => FilmError::FrameUnavailable { index },
            other => other,
        })?;
        self.resize_to_frame(image);
        self.surface.clear();
        self.surface.draw_image(image, 0.0, 0.0)?;
        self.draws += 1;
        debug!(frame_index, "drew frame");
        Ok(())
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
