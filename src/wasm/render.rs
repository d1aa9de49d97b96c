use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::error::{FilmError, FilmResult};
use crate::surface::{FrameImage, Surface};

impl FrameImage for HtmlImageElement {
    fn dimensions(&self) -> (u32, u32) {
        (self.natural_width(), self.natural_height())
    }
}

/// 2D canvas the film is painted on.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2D canvas not supported")?
            .dyn_into()?;

        // Fill the window until the first frame dictates the real size.
        let win = window().ok_or("no window")?;
        let w = win.inner_width()?.as_f64().unwrap_or(0.0);
        let h = win.inner_height()?.as_f64().unwrap_or(0.0);
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);

        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64) -> FilmResult<()> {
        self.ctx
            .draw_image_with_html_image_element(image, x, y)
            .map_err(|e| FilmError::surface(format!("drawImage failed: {e:?}")))
    }
}

type Slot = RefCell<Option<AnimationFrame>>;

/// Animation-frame loop; dropping it cancels the pending frame.
pub struct FrameLoop {
    // The pending frame lives here so the loop can be cancelled from outside
    // while each callback schedules its successor.
    _slot: Rc<Slot>,
}

impl FrameLoop {
    pub fn start(step: impl FnMut(f64) + 'static) -> Self {
        let slot: Rc<Slot> = Rc::new(RefCell::new(None));
        let step: Rc<RefCell<dyn FnMut(f64)>> = Rc::new(RefCell::new(step));
        schedule(Rc::downgrade(&slot), step);
        Self { _slot: slot }
    }
}

fn schedule(slot: Weak<Slot>, step: Rc<RefCell<dyn FnMut(f64)>>) {
    let Some(live) = slot.upgrade() else {
        return;
    };
    let frame = request_animation_frame(move |now| {
        (&mut *step.borrow_mut())(now);
        // schedule next
        schedule(slot, step);
    });
    *live.borrow_mut() = Some(frame);
}
