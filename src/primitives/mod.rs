//! Primitives - the built-in widgets.
//!
//! - [`Text`] - unwrapped lines of text
//! - [`SizedBox`], [`Padding`], [`Background`], [`Center`] - single-child boxes
//! - [`Flex`], [`Row`], [`Column`] - children along one axis

mod container;
mod flex;
mod text;

pub use container::{Background, Center, Padding, SizedBox};
pub use flex::{Column, Flex, Row};
pub use text::Text;
