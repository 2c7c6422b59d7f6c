//! Terminal setup and teardown, plus the input reader thread.
//!
//! Handles entering/exiting raw mode, alternate screen, mouse tracking and
//! bracketed paste through crossterm, and draws frames with the
//! [`DiffRenderer`].

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
};
use crossterm::execute;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::backend::Backend;
use crate::config::RunConfig;
use crate::layout::Size;
use crate::renderer::{Canvas, DiffRenderer};

// =============================================================================
// CrosstermBackend
// =============================================================================

/// Backend drawing to a real terminal.
///
/// Restores the terminal when dropped, even if [`leave`](Self::leave) was
/// never called.
pub struct CrosstermBackend<W: Write> {
    renderer: DiffRenderer<W>,
    is_raw: bool,
    alternate_screen: bool,
    mouse_enabled: bool,
    bracketed_paste: bool,
}

impl CrosstermBackend<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn new(writer: W) -> Self {
        Self {
            renderer: DiffRenderer::new(writer),
            is_raw: false,
            alternate_screen: false,
            mouse_enabled: false,
            bracketed_paste: false,
        }
    }

    /// Enter raw mode and enable the features `config` asks for.
    pub fn enter(&mut self, config: &RunConfig) -> io::Result<()> {
        enable_raw_mode()?;
        self.is_raw = true;

        let out = self.renderer.writer_mut();
        if config.alternate_screen {
            execute!(out, EnterAlternateScreen)?;
            self.alternate_screen = true;
        }
        execute!(out, Hide, Clear(ClearType::All))?;
        if config.mouse_capture {
            execute!(out, EnableMouseCapture)?;
            self.mouse_enabled = true;
        }
        if config.bracketed_paste {
            execute!(out, EnableBracketedPaste)?;
            self.bracketed_paste = true;
        }

        self.renderer.invalidate();
        debug!(
            alternate_screen = self.alternate_screen,
            mouse = self.mouse_enabled,
            paste = self.bracketed_paste,
            "terminal entered"
        );
        Ok(())
    }

    /// Undo everything [`enter`](Self::enter) enabled.
    pub fn leave(&mut self) -> io::Result<()> {
        let out = self.renderer.writer_mut();
        if self.bracketed_paste {
            execute!(out, DisableBracketedPaste)?;
            self.bracketed_paste = false;
        }
        if self.mouse_enabled {
            execute!(out, DisableMouseCapture)?;
            self.mouse_enabled = false;
        }
        execute!(out, Show)?;
        if self.alternate_screen {
            execute!(out, LeaveAlternateScreen)?;
            self.alternate_screen = false;
        }
        if self.is_raw {
            disable_raw_mode()?;
            self.is_raw = false;
        }
        debug!("terminal restored");
        Ok(())
    }

    pub fn is_entered(&self) -> bool {
        self.is_raw
    }
}

impl<W: Write> Backend for CrosstermBackend<W> {
    fn size(&mut self) -> io::Result<Size> {
        let (width, height) = terminal::size()?;
        Ok(Size::new(u32::from(width), u32::from(height)))
    }

    fn draw(&mut self, canvas: &Canvas) -> io::Result<()> {
        self.renderer.render(canvas)?;
        Ok(())
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        if self.is_raw {
            if let Err(err) = self.leave() {
                warn!(error = %err, "failed to restore terminal");
            }
        }
    }
}

// =============================================================================
// EventReader
// =============================================================================

/// How long a poll waits before re-checking the running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Dedicated input thread.
///
/// Reads crossterm events and forwards them to an async channel. Polls with
/// a timeout so it can be stopped cooperatively.
pub struct EventReader {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl EventReader {
    /// Spawn the reader thread.
    pub fn spawn() -> io::Result<(Self, mpsc::UnboundedReceiver<Event>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = thread::Builder::new()
            .name("cellwright-input".to_string())
            .spawn(move || {
                Self::read_loop(&running_clone, &tx);
                running_clone.store(false, Ordering::SeqCst);
            })?;

        Ok((
            Self {
                handle: Some(handle),
                running,
            },
            rx,
        ))
    }

    fn read_loop(running: &AtomicBool, tx: &mpsc::UnboundedSender<Event>) {
        while running.load(Ordering::SeqCst) {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    warn!(error = %err, "input poll failed");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(error = %err, "input read failed");
                    break;
                }
            }
        }
    }

    /// Stop the reader thread and wait for it.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("input thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.stop();
    }
}
