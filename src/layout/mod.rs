//! Layout Module
//!
//! Box-constraint geometry and the flex distribution math.
//!
//! # Protocol
//!
//! Layout is a negotiation between a parent and each of its children:
//!
//! 1. The parent offers [`Constraints`] (a min and max [`Size`]).
//! 2. The child picks a size inside that box and reports it back.
//! 3. The parent positions the child relative to its own origin.
//!
//! A size outside the offered box is a contract violation and aborts the
//! frame. It is never clamped silently.

pub mod flex;
pub mod geometry;

pub use flex::{
    Axis, CrossAxisAlignment, MainAxisAlignment, cross_axis_offset, main_axis_offsets,
    main_axis_spacing,
};
pub use geometry::{Constraints, Dimension, EdgeInsets, Pos, Size};
