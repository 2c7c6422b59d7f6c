//! Widgets - immutable descriptions of what should be shown.
//!
//! A [`Widget`] is one of exactly two capabilities:
//!
//! - [`StatefulWidget`]: builds one child widget, with access to hooks.
//! - [`RenderWidget`]: negotiates its size with its children and paints cells.
//!
//! Widgets are compared by value to decide whether an element needs work,
//! so every widget type implements `PartialEq` (derived or by hand) and
//! `Debug`. [`WidgetIdentity`] turns that into type-erased equality.
//!
//! # Example
//!
//! ```
//! use cellwright::{Result, StatefulWidget, Text, Widget, use_state};
//!
//! #[derive(Debug, PartialEq)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! impl StatefulWidget for Greeting {
//!     fn build(&self) -> Result<Widget> {
//!         let (visits, _set_visits) = use_state(0u32);
//!         Ok(Text::new(format!("hello {} ({visits})", self.name)).into())
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::element::Element;
use super::reconcile;
use crate::error::{Error, Result};
use crate::layout::{Constraints, Pos, Size};
use crate::renderer::Canvas;

// =============================================================================
// Identity
// =============================================================================

/// Type-erased identity and equality, implemented for every
/// `PartialEq + Debug + Send + Sync + 'static` type.
pub trait WidgetIdentity: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Value equality against another widget of possibly different type.
    fn dyn_eq(&self, other: &dyn Any) -> bool;

    /// Short type name used in errors and tree dumps.
    fn widget_name(&self) -> &'static str;
}

impl<T> WidgetIdentity for T
where
    T: Any + Send + Sync + fmt::Debug + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn widget_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<T>())
    }
}

/// `a::b::Foo<c::Bar>` -> `Foo<c::Bar>`
fn short_type_name(full: &'static str) -> &'static str {
    let base_end = full.find('<').unwrap_or(full.len());
    let start = full[..base_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}

// =============================================================================
// Capabilities
// =============================================================================

/// A widget that composes other widgets.
///
/// `build` runs with a hook context bound to this widget's element, so it
/// may call [`use_state`](crate::use_state), [`use_effect`](crate::use_effect)
/// and friends. Hooks must be called in the same order on every build.
pub trait StatefulWidget: WidgetIdentity {
    fn build(&self) -> Result<Widget>;
}

/// A widget that lays out children and paints cells.
pub trait RenderWidget: WidgetIdentity {
    /// Pick a size inside `ctx.constraints()`, laying out and positioning
    /// every child needed this pass.
    fn layout(&self, ctx: &mut LayoutContext) -> Result<Size>;

    /// Paint into a fresh canvas of the resolved size.
    ///
    /// Children are composited on top afterwards, so this only draws the
    /// widget's own content.
    fn paint(&self, ctx: &mut PaintContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }
}

// =============================================================================
// Widget
// =============================================================================

/// A node of the widget description tree.
#[derive(Clone)]
pub enum Widget {
    Stateful(Arc<dyn StatefulWidget>),
    Render(Arc<dyn RenderWidget>),
}

impl Widget {
    pub fn stateful(widget: impl StatefulWidget) -> Self {
        Self::Stateful(Arc::new(widget))
    }

    pub fn render(widget: impl RenderWidget) -> Self {
        Self::Render(Arc::new(widget))
    }

    /// Short type name of the concrete widget.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stateful(w) => w.widget_name(),
            Self::Render(w) => w.widget_name(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        match self {
            Self::Stateful(w) => (**w).as_any(),
            Self::Render(w) => (**w).as_any(),
        }
    }

    /// Whether both widgets share the same variant and concrete type.
    pub fn same_type(&self, other: &Widget) -> bool {
        let same_variant = matches!(
            (self, other),
            (Self::Stateful(_), Self::Stateful(_)) | (Self::Render(_), Self::Render(_))
        );
        same_variant && self.as_any().type_id() == other.as_any().type_id()
    }

    /// Concrete type id of the described widget.
    pub fn type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Downcast to the concrete widget type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// `Debug` output of the concrete widget (its props).
    pub(crate) fn props(&self) -> String {
        match self {
            Self::Stateful(w) => format!("{w:?}"),
            Self::Render(w) => format!("{w:?}"),
        }
    }
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        if !self.same_type(other) {
            return false;
        }
        match self {
            Self::Stateful(w) => w.dyn_eq(other.as_any()),
            Self::Render(w) => w.dyn_eq(other.as_any()),
        }
    }
}

/// Only the type name: a widget's props are shown at its own tree node.
impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// LayoutContext
// =============================================================================

/// Handed to [`RenderWidget::layout`].
///
/// Every child needed this pass must go through [`layout_child`]. Children
/// present last pass but not requested this time are destroyed once layout
/// finishes.
///
/// [`layout_child`]: LayoutContext::layout_child
pub struct LayoutContext {
    widget: &'static str,
    constraints: Constraints,
    previous: BTreeMap<usize, Element>,
    laid_out: Vec<(usize, Element)>,
}

impl LayoutContext {
    pub(crate) fn new(
        widget: &'static str,
        constraints: Constraints,
        previous: BTreeMap<usize, Element>,
    ) -> Self {
        Self {
            widget,
            constraints,
            previous,
            laid_out: Vec::new(),
        }
    }

    /// Constraints this widget must satisfy.
    #[inline]
    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    /// Name of the widget being laid out.
    #[inline]
    pub fn widget_name(&self) -> &'static str {
        self.widget
    }

    /// Reconcile the child at `key` against `widget` and return its size.
    ///
    /// Laying out the same key twice in one pass re-negotiates the same
    /// child element.
    pub fn layout_child(&mut self, key: usize, widget: &Widget, constraints: Constraints) -> Result<Size> {
        if let Some((_, child)) = self.laid_out.iter_mut().find(|(k, _)| *k == key) {
            reconcile::rebuild(child, widget, constraints)?;
            return Ok(child.size());
        }

        let mut child = self.previous.remove(&key).unwrap_or_default();
        let result = reconcile::rebuild(&mut child, widget, constraints);
        let size = child.size();
        // Kept even on failure so its cleanups still run later
        self.laid_out.push((key, child));
        result.map(|()| size)
    }

    /// Place a laid-out child relative to this widget's origin.
    pub fn position_child(&mut self, key: usize, pos: Pos) -> Result<()> {
        match self.laid_out.iter_mut().find(|(k, _)| *k == key) {
            Some((_, child)) => {
                child.pos = pos;
                Ok(())
            }
            None => Err(Error::PositionBeforeLayout {
                widget: self.widget,
                key,
            }),
        }
    }

    /// Attach opaque parent-defined data to a laid-out child.
    ///
    /// The data stays on the child element across frames until replaced.
    pub fn set_child_data<T: Any + Send + Sync>(&mut self, key: usize, data: T) -> Result<()> {
        match self.laid_out.iter_mut().find(|(k, _)| *k == key) {
            Some((_, child)) => {
                child.render_data = Some(Box::new(data));
                Ok(())
            }
            None => Err(Error::PositionBeforeLayout {
                widget: self.widget,
                key,
            }),
        }
    }

    /// Read back data attached to a child, in this pass or an earlier one.
    pub fn child_data<T: Any>(&self, key: usize) -> Option<&T> {
        self.laid_out
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, child)| child)
            .or_else(|| self.previous.get(&key))
            .and_then(|child| child.render_data::<T>())
    }

    /// `(laid out in order, not requested)`
    pub(crate) fn into_parts(self) -> (Vec<(usize, Element)>, BTreeMap<usize, Element>) {
        (self.laid_out, self.previous)
    }
}

// =============================================================================
// PaintContext
// =============================================================================

/// Handed to [`RenderWidget::paint`].
pub struct PaintContext<'a> {
    canvas: &'a mut Canvas,
    size: Size,
}

impl<'a> PaintContext<'a> {
    pub(crate) fn new(canvas: &'a mut Canvas, size: Size) -> Self {
        Self { canvas, size }
    }

    /// Canvas sized exactly to [`size`](Self::size).
    pub fn canvas(&mut self) -> &mut Canvas {
        self.canvas
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    impl StatefulWidget for Label {
        fn build(&self) -> Result<Widget> {
            Ok(Widget::render(Blank))
        }
    }

    #[derive(Debug, PartialEq)]
    struct Other(&'static str);

    impl StatefulWidget for Other {
        fn build(&self) -> Result<Widget> {
            Ok(Widget::render(Blank))
        }
    }

    #[derive(Debug, PartialEq)]
    struct Blank;

    impl RenderWidget for Blank {
        fn layout(&self, ctx: &mut LayoutContext) -> Result<Size> {
            Ok(ctx.constraints().min)
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Foo"), "Foo");
        assert_eq!(short_type_name("Foo"), "Foo");
        assert_eq!(short_type_name("a::Foo<b::Bar>"), "Foo<b::Bar>");
        assert_eq!(Widget::render(Blank).name(), "Blank");
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Widget::stateful(Label("a")), Widget::stateful(Label("a")));
        assert_ne!(Widget::stateful(Label("a")), Widget::stateful(Label("b")));
    }

    #[test]
    fn test_type_identity() {
        let a = Widget::stateful(Label("a"));
        let b = Widget::stateful(Other("a"));
        assert!(!a.same_type(&b));
        assert_ne!(a, b);
        assert!(a.same_type(&Widget::stateful(Label("z"))));
        assert!(!a.same_type(&Widget::render(Blank)));
    }

    #[test]
    fn test_downcast_and_debug() {
        let w = Widget::stateful(Label("x"));
        assert_eq!(w.downcast_ref::<Label>(), Some(&Label("x")));
        assert!(w.downcast_ref::<Other>().is_none());
        assert_eq!(format!("{w:?}"), "Label");
        assert_eq!(w.props(), "Label(\"x\")");
    }
}
