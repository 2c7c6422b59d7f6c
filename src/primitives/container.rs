//! Single-child box primitives.
//!
//! - [`SizedBox`]: a fixed size, no children
//! - [`Padding`]: insets around a child
//! - [`Background`]: fills its area with a color behind a child
//! - [`Center`]: centers a child, optionally sizing itself by a factor

use crate::engine::{LayoutContext, PaintContext, RenderWidget, Widget};
use crate::error::{Error, Result};
use crate::layout::{Constraints, Dimension, EdgeInsets, Pos, Size};
use crate::types::Rgba;

// =============================================================================
// SizedBox
// =============================================================================

/// Reports a fixed size regardless of constraints.
///
/// Placing it where the size is not allowed is a constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizedBox {
    pub width: u32,
    pub height: u32,
}

impl SizedBox {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderWidget for SizedBox {
    fn layout(&self, _ctx: &mut LayoutContext) -> Result<Size> {
        Ok(Size::new(self.width, self.height))
    }
}

impl From<SizedBox> for Widget {
    fn from(sized: SizedBox) -> Self {
        Widget::render(sized)
    }
}

// =============================================================================
// Padding
// =============================================================================

/// Insets a child by `insets` on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct Padding {
    pub insets: EdgeInsets,
    pub child: Widget,
}

impl Padding {
    pub fn new(insets: EdgeInsets, child: impl Into<Widget>) -> Self {
        Self {
            insets,
            child: child.into(),
        }
    }
}

impl RenderWidget for Padding {
    fn layout(&self, ctx: &mut LayoutContext) -> Result<Size> {
        let constraints = ctx.constraints();
        let max = constraints
            .max
            .checked_sub_insets(self.insets)
            .ok_or(Error::InsufficientSpace {
                widget: ctx.widget_name(),
                constraints,
                insets: self.insets,
            })?;
        let min = constraints.min.sub_insets(self.insets);

        let child = ctx.layout_child(0, &self.child, Constraints::new(min, max))?;
        ctx.position_child(0, Pos::new(self.insets.left as i32, self.insets.top as i32))?;
        Ok(child.add_insets(self.insets))
    }
}

impl From<Padding> for Widget {
    fn from(padding: Padding) -> Self {
        Widget::render(padding)
    }
}

// =============================================================================
// Background
// =============================================================================

/// Paints `color` under its whole area, then the child on top.
///
/// With a foreground set, the child's default-colored text takes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub color: Rgba,
    pub fg: Option<Rgba>,
    pub child: Widget,
}

impl Background {
    pub fn new(color: Rgba, child: impl Into<Widget>) -> Self {
        Self {
            color,
            fg: None,
            child: child.into(),
        }
    }

    pub fn with_fg(mut self, fg: Rgba) -> Self {
        self.fg = Some(fg);
        self
    }
}

impl RenderWidget for Background {
    fn layout(&self, ctx: &mut LayoutContext) -> Result<Size> {
        let size = ctx.layout_child(0, &self.child, ctx.constraints())?;
        ctx.position_child(0, Pos::ORIGIN)?;
        Ok(size)
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) -> Result<()> {
        let (width, height) = (ctx.width(), ctx.height());
        let canvas = ctx.canvas();
        canvas.fill_background(0, 0, width, height, self.color);
        if let Some(fg) = self.fg {
            canvas.fill_foreground(0, 0, width, height, fg);
        }
        Ok(())
    }
}

impl From<Background> for Widget {
    fn from(background: Background) -> Self {
        Widget::render(background)
    }
}

// =============================================================================
// Center
// =============================================================================

/// Centers a child in the space it takes.
///
/// Without a factor an axis takes all of the max constraint, or shrinks to
/// the child when the max is infinite. With a factor the axis is the child's
/// extent times the factor. Either way the result is clamped into the
/// constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Center {
    pub child: Widget,
    pub width_factor: Option<f32>,
    pub height_factor: Option<f32>,
}

impl Center {
    pub fn new(child: impl Into<Widget>) -> Self {
        Self {
            child: child.into(),
            width_factor: None,
            height_factor: None,
        }
    }

    pub fn with_width_factor(mut self, factor: f32) -> Self {
        self.width_factor = Some(factor);
        self
    }

    pub fn with_height_factor(mut self, factor: f32) -> Self {
        self.height_factor = Some(factor);
        self
    }
}

fn centered_extent(max: Dimension, child: Dimension, factor: Option<f32>) -> Dimension {
    match (factor, child) {
        (Some(factor), Dimension::Cells(cells)) => Dimension::Cells((cells as f32 * factor.max(0.0)).round() as u32),
        (Some(_), Dimension::Infinite) => Dimension::Infinite,
        (None, _) if max.is_infinite() => child,
        (None, _) => max,
    }
}

impl RenderWidget for Center {
    fn layout(&self, ctx: &mut LayoutContext) -> Result<Size> {
        let constraints = ctx.constraints();
        let child = ctx.layout_child(0, &self.child, constraints.loosen())?;

        let size = Size {
            width: centered_extent(constraints.max.width, child.width, self.width_factor),
            height: centered_extent(constraints.max.height, child.height, self.height_factor),
        }
        .constrain(constraints);

        let spare_x = size.width.cells_or_max().saturating_sub(child.width.cells_or_max());
        let spare_y = size.height.cells_or_max().saturating_sub(child.height.cells_or_max());
        ctx.position_child(0, Pos::new((spare_x / 2) as i32, (spare_y / 2) as i32))?;
        Ok(size)
    }
}

impl From<Center> for Widget {
    fn from(center: Center) -> Self {
        Widget::render(center)
    }
}
