//! Event dispatch.
//!
//! Runs beside the frame loop. Each incoming event either stops the app (a
//! quit key) or is handed to every listener in the tree, each on its own
//! blocking task so a slow listener never stalls rendering or its siblings.
//!
//! The tree lock is held only while listeners are collected, never while
//! they run: listeners talk to the tree through state setters.

use std::sync::Arc;

use crossterm::event::Event;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use super::mount::{ShutdownSignal, ShutdownTrigger};
use crate::config::RunConfig;
use crate::engine::ElementTree;

pub(crate) async fn dispatch_events(
    tree: Arc<Mutex<ElementTree>>,
    mut events: mpsc::UnboundedReceiver<Event>,
    config: Arc<RunConfig>,
    shutdown: ShutdownTrigger,
    mut stop: ShutdownSignal,
) {
    let mut listeners: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            _ = stop.wait() => break,
            Some(finished) = listeners.join_next(), if !listeners.is_empty() => {
                if let Err(err) = finished {
                    if err.is_panic() {
                        warn!("event listener panicked");
                    }
                }
            }
            received = events.recv() => {
                let Some(event) = received else {
                    debug!("event source closed");
                    break;
                };
                if config.is_quit_event(&event) {
                    debug!("quit key pressed");
                    shutdown.trigger();
                    break;
                }

                let calls = tree.lock().await.listeners_for(&event);
                trace!(listeners = calls.len(), "dispatching event");
                for call in calls {
                    listeners.spawn_blocking(move || call.invoke());
                }
            }
        }
    }

    listeners.abort_all();
}
