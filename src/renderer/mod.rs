//! Renderer Module
//!
//! The cell grid everything is painted into, and the differential terminal
//! writer the crossterm backend draws it with.

pub mod canvas;
pub mod diff;

pub use canvas::Canvas;
pub use diff::{DiffRenderer, terminal_color};
