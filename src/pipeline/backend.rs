//! Output backends.
//!
//! A [`Backend`] reports the viewport size and draws finished canvases. The
//! frame loop never touches the terminal directly, so the same loop drives
//! [`CrosstermBackend`](super::terminal::CrosstermBackend) and the in-memory
//! [`TestBackend`].

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::layout::Size;
use crate::renderer::Canvas;

/// Where frames go.
pub trait Backend {
    /// Current viewport size.
    fn size(&mut self) -> io::Result<Size>;

    /// Present a finished frame.
    fn draw(&mut self, canvas: &Canvas) -> io::Result<()>;
}

#[derive(Debug, Default)]
struct TestScreen {
    size: Size,
    frames: usize,
    last: Option<Canvas>,
}

/// In-memory backend.
///
/// Clones share one screen, so a test can keep a handle while the frame
/// loop owns another.
#[derive(Debug, Clone, Default)]
pub struct TestBackend {
    screen: Arc<Mutex<TestScreen>>,
}

impl TestBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            screen: Arc::new(Mutex::new(TestScreen {
                size: Size::new(width, height),
                ..TestScreen::default()
            })),
        }
    }

    fn screen(&self) -> MutexGuard<'_, TestScreen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.screen().size = Size::new(width, height);
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> usize {
        self.screen().frames
    }

    pub fn last_canvas(&self) -> Option<Canvas> {
        self.screen().last.clone()
    }

    /// Characters of the last frame, row by row.
    pub fn lines(&self) -> Vec<String> {
        self.screen().last.as_ref().map(Canvas::to_lines).unwrap_or_default()
    }
}

impl Backend for TestBackend {
    fn size(&mut self) -> io::Result<Size> {
        Ok(self.screen().size)
    }

    fn draw(&mut self, canvas: &Canvas) -> io::Result<()> {
        let mut screen = self.screen();
        screen.frames += 1;
        screen.last = Some(canvas.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn test_backend_records_frames() {
        let handle = TestBackend::new(3, 1);
        let mut backend = handle.clone();
        assert_eq!(backend.size().unwrap(), Size::new(3, 1));
        assert!(handle.lines().is_empty());

        let mut canvas = Canvas::new(3, 1);
        canvas.print(0, 0, "hey", Rgba::WHITE, None);
        backend.draw(&canvas).unwrap();

        assert_eq!(handle.frames(), 1);
        assert_eq!(handle.lines(), vec!["hey"]);
        assert_eq!(handle.last_canvas(), Some(canvas));
    }

    #[test]
    fn test_backend_resize_is_shared() {
        let handle = TestBackend::new(3, 1);
        let mut backend = handle.clone();
        handle.resize(10, 4);
        assert_eq!(backend.size().unwrap(), Size::new(10, 4));
    }
}
