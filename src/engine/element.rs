//! Element - the persistent node behind a widget.
//!
//! Widgets are thrown away and recreated every build; elements survive.
//! An element owns everything that must outlive a single description:
//! hook slots, effect cleanups, listeners, the last layout result and the
//! cached canvas of a render widget.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──build──► Initialized ──destroy──► Uninitialized (fresh)
//!                              │  ▲
//!                              └──┘ rebuild / reuse
//! ```
//!
//! Destroying an element runs the cleanups of its subtree and resets it to
//! a fresh default, dropping its hook store so outstanding setters become
//! no-ops.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::hooks::{Effect, HookStore, Listener};
use super::widget::Widget;
use crate::layout::{Constraints, Pos, Size};
use crate::renderer::Canvas;

/// A node of the element tree.
#[derive(Default)]
pub struct Element {
    pub(crate) widget: Option<Widget>,
    pub(crate) initialized: bool,
    pub(crate) constraints: Constraints,
    pub(crate) size: Size,
    /// Offset from the parent's origin.
    pub(crate) pos: Pos,
    /// Offset from the root, refreshed every render pass.
    pub(crate) abs_pos: Pos,
    pub(crate) painted: Option<Canvas>,
    pub(crate) needs_paint: bool,
    pub(crate) hooks: Arc<HookStore>,
    pub(crate) effects: Vec<Effect>,
    pub(crate) listeners: Vec<Listener>,
    /// Keyed children, in the order the parent laid them out.
    pub(crate) children: Vec<(usize, Element)>,
    pub(crate) render_data: Option<Box<dyn Any + Send + Sync>>,
}

impl Element {
    /// The widget this element was last built from.
    pub fn widget(&self) -> Option<&Widget> {
        self.widget.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Constraints of the last layout.
    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Position relative to the parent.
    pub fn position(&self) -> Pos {
        self.pos
    }

    /// Position relative to the root, as of the last render.
    pub fn absolute_position(&self) -> Pos {
        self.abs_pos
    }

    /// Children with their keys, in layout order.
    pub fn children(&self) -> impl Iterator<Item = (usize, &Element)> {
        self.children.iter().map(|(key, child)| (*key, child))
    }

    pub fn child(&self, key: usize) -> Option<&Element> {
        self.children.iter().find(|(k, _)| *k == key).map(|(_, child)| child)
    }

    /// Data attached by the parent's layout.
    pub fn render_data<T: Any>(&self) -> Option<&T> {
        self.render_data.as_ref()?.downcast_ref::<T>()
    }

    /// Number of event listeners registered by the last build.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live effects.
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub(crate) fn name(&self) -> &'static str {
        self.widget.as_ref().map_or("<uninitialized>", Widget::name)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("widget", &self.name())
            .field("size", &self.size)
            .field("pos", &self.pos)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}
