//! Engine - widgets, elements, hooks and reconciliation.
//!
//! The engine manages the core data structures:
//! - Widget: immutable description, stateful or render
//! - Element: persistent node holding state, layout and paint caches
//! - Hooks: positional per-element state, effects and listeners
//! - ElementTree: the mounted root, one `frame` per tick
//!
//! # Architecture
//!
//! ```text
//! Widget tree (rebuilt by user code)      Element tree (persistent)
//!
//! Row ─┬─ Text "a"            rebuild     Element(Row) ─ Element(Flex) ─┬─ Element(Text)
//!      └─ Counter      ─────────────►                                   └─ Element(Counter) ─ ...
//! ```
//!
//! Work is skipped wherever a widget compares equal to the one an element
//! was built from, its constraints are unchanged and no state changed.

mod element;
mod hooks;
mod reconcile;
mod tree;
mod widget;

pub use element::Element;
pub use hooks::{
    Cleanup, Dependency, Deps, EventContext, Listener, RenderTrigger, Setup, StateSetter, use_cleanup,
    use_effect, use_event, use_raw_state, use_ref, use_setup, use_state, use_state_with, use_trigger_render,
};
pub use reconcile::ListenerCall;
pub use tree::ElementTree;
pub use widget::{LayoutContext, PaintContext, RenderWidget, StatefulWidget, Widget, WidgetIdentity};
