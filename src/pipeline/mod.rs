//! Pipeline - from widget to screen.
//!
//! # Pipeline Architecture
//!
//! ```text
//! input thread ──► events ──► dispatcher ──► listeners ──► state setters
//!                                                               │ dirty
//!                                                               ▼
//! viewport ──► ElementTree::frame ──► Canvas ──► Backend::draw
//! ```
//!
//! - [`backend`] - where frames go (`TestBackend` in memory)
//! - [`terminal`] - crossterm terminal setup, diff drawing, input thread
//! - [`mount`] - the `App` frame loop and shutdown plumbing

pub mod backend;
mod events;
pub mod mount;
pub mod terminal;

pub use backend::{Backend, TestBackend};
pub use mount::{App, ShutdownSignal, ShutdownTrigger, run_terminal, shutdown_channel};
pub use terminal::{CrosstermBackend, EventReader};
