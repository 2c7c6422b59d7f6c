//! Mount API - application lifecycle and the frame loop.
//!
//! [`App::run`] owns one [`ElementTree`] behind an async mutex and drives
//! two tasks until shutdown:
//!
//! ```text
//!   frame loop                        dispatcher
//!   ──────────                        ──────────
//!   lock tree                         recv event
//!   reconcile + render (viewport)     quit key? ──► trigger shutdown
//!   unlock, draw canvas               lock tree, collect listeners, unlock
//!   yield / sleep                     spawn one blocking task per listener
//! ```
//!
//! On shutdown (or a frame error) the dispatcher is stopped and the tree is
//! destroyed, so every effect cleanup runs before `run` returns.
//!
//! # Example
//!
//! ```no_run
//! use cellwright::{RunConfig, Text, run_terminal};
//!
//! #[tokio::main]
//! async fn main() -> cellwright::Result<()> {
//!     run_terminal(Text::new("press esc to quit").into(), RunConfig::default()).await
//! }
//! ```

use std::sync::Arc;

use crossterm::event::Event;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{info, trace, warn};

use super::backend::Backend;
use super::events::dispatch_events;
use super::terminal::{CrosstermBackend, EventReader};
use crate::config::RunConfig;
use crate::engine::{ElementTree, Widget};
use crate::error::Result;

// =============================================================================
// Shutdown
// =============================================================================

/// Fires the termination signal. Clones share one signal.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownTrigger {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ShutdownTrigger {
    fn default() -> Self {
        Self::new()
    }
}

/// Observes a [`ShutdownTrigger`].
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once triggered. Never resolves if every trigger is dropped
    /// untriggered.
    pub async fn wait(&mut self) {
        let closed = self.rx.wait_for(|triggered| *triggered).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// A connected trigger/signal pair.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let trigger = ShutdownTrigger::new();
    let signal = trigger.subscribe();
    (trigger, signal)
}

// =============================================================================
// App
// =============================================================================

/// The frame loop bound to a backend.
pub struct App<B: Backend> {
    backend: B,
    config: Arc<RunConfig>,
}

impl<B: Backend> App<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: Arc::new(RunConfig::default()),
        }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Render `widget` every tick and dispatch `events` until `shutdown`
    /// fires, a quit key arrives, or a frame fails.
    ///
    /// The tree is destroyed before returning in every case. A frame error
    /// is returned after teardown.
    pub async fn run(
        &mut self,
        widget: Widget,
        events: mpsc::UnboundedReceiver<Event>,
        shutdown: &ShutdownTrigger,
    ) -> Result<()> {
        info!(root = widget.name(), "starting frame loop");
        let tree = Arc::new(Mutex::new(ElementTree::new()));

        let dispatcher = tokio::spawn(dispatch_events(
            Arc::clone(&tree),
            events,
            Arc::clone(&self.config),
            shutdown.clone(),
            shutdown.subscribe(),
        ));

        let mut signal = shutdown.subscribe();
        let mut frames: u64 = 0;
        let result = loop {
            if signal.is_triggered() {
                break Ok(());
            }
            if let Err(err) = self.frame(&tree, &widget).await {
                warn!(error = %err, frames, "frame failed, stopping");
                break Err(err);
            }
            frames += 1;

            match self.config.frame_interval {
                Some(interval) => {
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {}
                        _ = signal.wait() => {}
                    }
                }
                None => tokio::task::yield_now().await,
            }
        };

        shutdown.trigger();
        if let Err(err) = dispatcher.await {
            warn!(error = %err, "event dispatcher failed");
        }
        tree.lock().await.destroy();
        info!(frames, "frame loop stopped");
        result
    }

    /// One tick: size the viewport, reconcile, render and draw.
    async fn frame(&mut self, tree: &Mutex<ElementTree>, widget: &Widget) -> Result<()> {
        let viewport = self.backend.size()?;
        let canvas = {
            let mut tree = tree.lock().await;
            let canvas = tree.frame(widget, viewport)?;
            if self.config.trace_tree {
                trace!(tree = %tree.describe(), "frame");
            }
            canvas
        };
        self.backend.draw(&canvas)?;
        Ok(())
    }
}

// =============================================================================
// Terminal entry point
// =============================================================================

/// Run `widget` full-screen on stdout until a quit key or SIGINT.
///
/// Sets the terminal up according to `config` and restores it afterwards,
/// including when the frame loop fails.
pub async fn run_terminal(widget: Widget, config: RunConfig) -> Result<()> {
    let mut backend = CrosstermBackend::stdout();
    backend.enter(&config)?;
    let (mut reader, events) = EventReader::spawn()?;

    let shutdown = ShutdownTrigger::new();
    let on_interrupt = shutdown.clone();
    let interrupts = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.trigger();
        }
    });

    let mut app = App::new(backend).with_config(config);
    let result = app.run(widget, events, &shutdown).await;

    interrupts.abort();
    reader.stop();
    let restored = app.backend_mut().leave();
    result?;
    restored?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal_resolves_after_trigger() {
        let (trigger, mut signal) = shutdown_channel();
        assert!(!signal.is_triggered());

        let waiter = tokio::spawn(async move {
            signal.wait().await;
            signal.is_triggered()
        });
        trigger.trigger();
        assert!(waiter.await.unwrap());
        assert!(trigger.is_triggered());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_trigger() {
        let trigger = ShutdownTrigger::new();
        trigger.trigger();
        let mut signal = trigger.subscribe();
        assert!(signal.is_triggered());
        signal.wait().await;
    }
}
