#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use scrollfilm_wasm::{
    AssetLoader, Film, FilmConfig, FilmError, FilmResult, FrameImage, ReadyPolicy, ScrollHost, Surface,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TestFrame {
    pub id: usize,
    pub width: u32,
    pub height: u32,
}

impl TestFrame {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            width: 1920,
            height: 1080,
        }
    }
}

impl FrameImage for TestFrame {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    pub size: (u32, u32),
    pub clears: usize,
    pub painted: Vec<usize>,
}

impl Surface for RecordingSurface {
    type Image = TestFrame;

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_image(&mut self, image: &TestFrame, _x: f64, _y: f64) -> FilmResult<()> {
        self.painted.push(image.id);
        Ok(())
    }
}

/// Canvas that rejects every draw, like a tainted or lost context.
#[derive(Default)]
pub struct BrokenSurface {
    pub size: (u32, u32),
    pub attempts: usize,
}

impl Surface for BrokenSurface {
    type Image = TestFrame;

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn clear(&mut self) {}

    fn draw_image(&mut self, _image: &TestFrame, _x: f64, _y: f64) -> FilmResult<()> {
        self.attempts += 1;
        Err(FilmError::surface("context lost"))
    }
}

#[derive(Debug)]
pub struct PageState {
    pub viewport: (f64, f64),
    pub content: f64,
    pub native: f64,
    pub doc_height: f64,
    pub translated: f64,
    pub pinned: bool,
    pub overflow_writes: usize,
}

/// In-memory page; clones share state so tests can poke at it after the
/// film took ownership.
#[derive(Clone)]
pub struct FakePage(pub Rc<RefCell<PageState>>);

impl FakePage {
    pub fn new(content: f64) -> Self {
        Self(Rc::new(RefCell::new(PageState {
            viewport: (1280.0, 800.0),
            content,
            native: 0.0,
            doc_height: 0.0,
            translated: 0.0,
            pinned: false,
            overflow_writes: 0,
        })))
    }

    pub fn scroll_natively(&self, top: f64) {
        self.0.borrow_mut().native = top;
    }
}

impl ScrollHost for FakePage {
    fn viewport_size(&self) -> (f64, f64) {
        self.0.borrow().viewport
    }

    fn native_scroll_top(&self) -> f64 {
        self.0.borrow().native
    }

    fn set_native_scroll_top(&mut self, value: f64) {
        self.0.borrow_mut().native = value;
    }

    fn document_height(&self) -> f64 {
        self.0.borrow().doc_height
    }

    fn set_document_height(&mut self, height: f64) {
        self.0.borrow_mut().doc_height = height;
    }

    fn content_height(&self) -> f64 {
        self.0.borrow().content
    }

    fn translate_content(&mut self, offset_px: f64) {
        self.0.borrow_mut().translated = offset_px;
    }

    fn force_content_overflow_visible(&mut self) {
        self.0.borrow_mut().overflow_writes += 1;
    }

    fn pin_viewport(&mut self) {
        self.0.borrow_mut().pinned = true;
    }

    fn release_viewport(&mut self) {
        let mut page = self.0.borrow_mut();
        page.pinned = false;
        page.translated = 0.0;
        page.doc_height = 0.0;
    }
}

#[derive(Default)]
pub struct QueueLoader {
    pub requests: Vec<(usize, String)>,
}

impl AssetLoader for QueueLoader {
    fn request(&mut self, index: usize, locator: &str) {
        self.requests.push((index, locator.to_string()));
    }
}

pub type TestFilm = Film<RecordingSurface, FakePage>;

pub fn config(frame_count: usize) -> FilmConfig {
    FilmConfig::new(frame_count, |i| format!("frame/{}.jpg", i + 1))
}

/// Builds a film and completes every frame in index order.
pub fn ready_film(config: FilmConfig, page: &FakePage) -> TestFilm {
    let frame_count = config.frame_count;
    let config = config.ready_when(ReadyPolicy::AllLoaded);
    let mut film = Film::new(config, RecordingSurface::default(), page.clone()).unwrap();
    film.load(&mut QueueLoader::default());
    for i in 0..frame_count {
        film.asset_loaded(i, TestFrame::new(i)).unwrap();
    }
    assert!(film.is_ready());
    film
}
