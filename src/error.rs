//! Error types for cellwright.

use std::io;

use thiserror::Error;

use crate::layout::{Constraints, EdgeInsets, Size};

/// Errors that abort a frame.
///
/// Nothing is recovered inside a frame: an error from any widget unwinds the
/// whole reconcile/render pass and no canvas is produced for that tick.
#[derive(Error, Debug)]
pub enum Error {
    /// A render widget's layout returned a size outside its constraints.
    #[error("constraints violated for widget {widget}: {constraints}, actual {actual}")]
    ConstraintViolation {
        widget: &'static str,
        constraints: Constraints,
        actual: Size,
    },

    /// A rebuild declared a different number of effects than the last one.
    ///
    /// Hooks are addressed by call order, so conditional hook calls break them.
    #[error(
        "different number of effects found in widget {widget}: last build had {previous}, this build has {current}"
    )]
    EffectCountMismatch {
        widget: &'static str,
        previous: usize,
        current: usize,
    },

    /// `position_child` was called before `layout_child` for that key.
    #[error("widget {widget} positioned child {key} before laying it out")]
    PositionBeforeLayout { widget: &'static str, key: usize },

    /// Insets leave less than zero usable space.
    #[error("not enough space in widget {widget} for insets {insets} given {constraints}")]
    InsufficientSpace {
        widget: &'static str,
        constraints: Constraints,
        insets: EdgeInsets,
    },

    /// A canvas was requested for an infinite size.
    #[error("canvas cannot be created with infinite size {size} for widget {widget}")]
    UnboundedCanvas { widget: &'static str, size: Size },

    /// Failure reported by a widget's own build, layout or paint.
    #[error("{0}")]
    Widget(String),

    /// Backend I/O failure.
    #[error("backend error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a widget-defined error.
    pub fn widget(message: impl Into<String>) -> Self {
        Self::Widget(message.into())
    }

    /// Whether this error points at a bug in a widget rather than at a
    /// runtime condition.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::ConstraintViolation { .. }
                | Self::EffectCountMismatch { .. }
                | Self::UnboundedCanvas { .. }
        )
    }
}

/// Result type for cellwright operations.
pub type Result<T> = std::result::Result<T, Error>;
