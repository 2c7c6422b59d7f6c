//! Flex primitives - children stacked along one axis.
//!
//! [`Flex`] is the render widget; [`Row`] and [`Column`] are stateful
//! wrappers that build a `Flex` with a fixed direction.
//!
//! # Algorithm
//!
//! 1. Lay children out in order. Each is offered the main-axis space not yet
//!    consumed and the full cross-axis max; with `Stretch` the cross axis is
//!    tight at that max.
//! 2. The main extent is the max constraint, or with `main_axis_shrink_wrap`
//!    the consumed space raised to the min constraint.
//! 3. The cross extent is the largest child cross extent raised to the min
//!    constraint (the max when stretching).
//! 4. Leftover main-axis space is distributed by the main-axis alignment and
//!    each child is placed across by the cross-axis alignment.

use crate::engine::{LayoutContext, RenderWidget, StatefulWidget, Widget};
use crate::error::Result;
use crate::layout::flex::{cross_axis_offset, main_axis_offsets};
use crate::layout::{Axis, Constraints, CrossAxisAlignment, Dimension, MainAxisAlignment, Size};

// =============================================================================
// Flex
// =============================================================================

/// Lays children out along `direction`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flex {
    pub direction: Axis,
    pub children: Vec<Widget>,
    pub main_axis_alignment: MainAxisAlignment,
    pub main_axis_shrink_wrap: bool,
    pub cross_axis_alignment: CrossAxisAlignment,
}

impl Flex {
    pub fn new(direction: Axis, children: impl IntoIterator<Item = Widget>) -> Self {
        Self {
            direction,
            children: children.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl RenderWidget for Flex {
    fn layout(&self, ctx: &mut LayoutContext) -> Result<Size> {
        let axis = self.direction;
        let constraints = ctx.constraints();
        let max_main = axis.main(constraints.max);
        let max_cross = axis.cross(constraints.max);
        let stretch = self.cross_axis_alignment == CrossAxisAlignment::Stretch;

        let child_min_cross = if stretch { max_cross } else { Dimension::ZERO };
        let mut consumed: u32 = 0;
        let mut final_cross = if stretch {
            max_cross
        } else {
            axis.cross(constraints.min)
        };
        let mut sizes = Vec::with_capacity(self.children.len());

        for (key, child) in self.children.iter().enumerate() {
            let child_constraints = Constraints::new(
                axis.size(Dimension::ZERO, child_min_cross),
                axis.size(max_main.sub_cells(consumed), max_cross),
            );
            let size = ctx.layout_child(key, child, child_constraints)?;
            consumed = consumed.saturating_add(axis.main(size).cells_or_max());
            final_cross = final_cross.max(axis.cross(size));
            sizes.push(size);
        }

        let final_main = if self.main_axis_shrink_wrap {
            Dimension::Cells(consumed).max(axis.main(constraints.min))
        } else {
            max_main
        };

        // Infinite main extent leaves nothing to distribute
        let remaining = final_main.cells().map_or(0, |main| main.saturating_sub(consumed));
        let extents: Vec<u32> = sizes.iter().map(|size| axis.main(*size).cells_or_max()).collect();
        let offsets = main_axis_offsets(self.main_axis_alignment, remaining, &extents);

        let cross_extent = final_cross.cells_or_max();
        for (key, (size, main)) in sizes.iter().zip(offsets).enumerate() {
            let cross = cross_axis_offset(
                self.cross_axis_alignment,
                cross_extent,
                axis.cross(*size).cells_or_max(),
            );
            ctx.position_child(key, axis.pos(main, cross))?;
        }

        Ok(axis.size(final_main, final_cross))
    }
}

impl From<Flex> for Widget {
    fn from(flex: Flex) -> Self {
        Widget::render(flex)
    }
}

// =============================================================================
// Row / Column
// =============================================================================

macro_rules! flex_wrapper {
    ($(#[$doc:meta])* $name:ident, $axis:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            pub children: Vec<Widget>,
            pub main_axis_alignment: MainAxisAlignment,
            pub main_axis_shrink_wrap: bool,
            pub cross_axis_alignment: CrossAxisAlignment,
        }

        impl $name {
            pub fn new(children: impl IntoIterator<Item = Widget>) -> Self {
                Self {
                    children: children.into_iter().collect(),
                    ..Self::default()
                }
            }

            pub fn main_axis(mut self, alignment: MainAxisAlignment) -> Self {
                self.main_axis_alignment = alignment;
                self
            }

            pub fn cross_axis(mut self, alignment: CrossAxisAlignment) -> Self {
                self.cross_axis_alignment = alignment;
                self
            }

            pub fn shrink_wrap(mut self) -> Self {
                self.main_axis_shrink_wrap = true;
                self
            }
        }

        impl StatefulWidget for $name {
            fn build(&self) -> Result<Widget> {
                Ok(Flex {
                    direction: $axis,
                    children: self.children.clone(),
                    main_axis_alignment: self.main_axis_alignment,
                    main_axis_shrink_wrap: self.main_axis_shrink_wrap,
                    cross_axis_alignment: self.cross_axis_alignment,
                }
                .into())
            }
        }

        impl From<$name> for Widget {
            fn from(widget: $name) -> Self {
                Widget::stateful(widget)
            }
        }
    };
}

flex_wrapper!(
    /// Children left to right.
    Row,
    Axis::Horizontal
);

flex_wrapper!(
    /// Children top to bottom.
    Column,
    Axis::Vertical
);
