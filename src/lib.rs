//! # cellwright
//!
//! Retained-mode terminal UI engine.
//!
//! Applications describe their interface as an immutable tree of widgets.
//! Every frame the engine reconciles that description against a persistent
//! element tree, lays it out with box constraints, paints only what changed
//! and composites the result into one canvas of cells.
//!
//! ## Architecture
//!
//! ```text
//! Widget tree → reconcile (hooks, effects) → layout (constraints) → paint → composite → Backend
//! ```
//!
//! - Stateful widgets build other widgets and keep state in hooks
//!   ([`use_state`], [`use_effect`], [`use_event`], ...).
//! - Render widgets size themselves inside [`Constraints`], place their
//!   children and paint into a [`Canvas`].
//! - Colors are straight-alpha RGBA; overlapping canvases blend.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Attr, Cell, TextStyle)
//! - [`layout`] - Dimensions, sizes, constraints and flex placement math
//! - [`renderer`] - Canvas compositing and the differential terminal writer
//! - [`engine`] - Widgets, elements, hooks and reconciliation
//! - [`primitives`] - Built-in widgets (Text, Padding, Flex, ...)
//! - [`pipeline`] - Backends, the frame loop and event dispatch
//! - [`config`] - Run configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{KeyChord, RunConfig};

pub use error::{Error, Result};

pub use layout::{
    Axis, Constraints, CrossAxisAlignment, Dimension, EdgeInsets, MainAxisAlignment, Pos, Size,
};

pub use renderer::{Canvas, DiffRenderer};

pub use engine::{
    Cleanup, Dependency, Deps, Element, ElementTree, EventContext, LayoutContext, Listener, ListenerCall,
    PaintContext, RenderTrigger, RenderWidget, StateSetter, StatefulWidget, Widget, WidgetIdentity,
    use_cleanup, use_effect, use_event, use_raw_state, use_ref, use_setup, use_state, use_state_with,
    use_trigger_render,
};

pub use primitives::{Background, Center, Column, Flex, Padding, Row, SizedBox, Text};

pub use pipeline::{
    App, Backend, CrosstermBackend, EventReader, ShutdownSignal, ShutdownTrigger, TestBackend, run_terminal,
    shutdown_channel,
};
