//! Geometry primitives: dimensions, sizes, positions, constraints, insets.
//!
//! A [`Dimension`] is either a finite number of cells or
//! [`Dimension::Infinite`]. Infinity is absorbing: `Infinite ± x = Infinite`.
//! Finite subtraction saturates at zero; use [`Dimension::checked_sub`] where
//! running out of space is an error.

use std::fmt;
use std::ops::{Add, Sub};

// =============================================================================
// Dimension
// =============================================================================

/// A length along one axis, in terminal cells.
///
/// Ordering puts every finite value below `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    /// Finite length in cells.
    Cells(u32),
    /// Unbounded.
    Infinite,
}

impl Dimension {
    pub const ZERO: Self = Self::Cells(0);

    #[inline]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Cells(0))
    }

    /// Finite value, or `None` when infinite.
    #[inline]
    pub const fn cells(self) -> Option<u32> {
        match self {
            Self::Cells(n) => Some(n),
            Self::Infinite => None,
        }
    }

    /// Finite value, with infinity mapped to `u32::MAX`.
    #[inline]
    pub const fn cells_or_max(self) -> u32 {
        match self {
            Self::Cells(n) => n,
            Self::Infinite => u32::MAX,
        }
    }

    /// Subtract a finite amount, failing if the result would be negative.
    pub fn checked_sub(self, cells: u32) -> Option<Self> {
        match self {
            Self::Cells(n) => n.checked_sub(cells).map(Self::Cells),
            Self::Infinite => Some(Self::Infinite),
        }
    }

    /// Add a finite amount.
    pub fn add_cells(self, cells: u32) -> Self {
        match self {
            Self::Cells(n) => Self::Cells(n.saturating_add(cells)),
            Self::Infinite => Self::Infinite,
        }
    }

    /// Subtract a finite amount, saturating at zero.
    pub fn sub_cells(self, cells: u32) -> Self {
        match self {
            Self::Cells(n) => Self::Cells(n.saturating_sub(cells)),
            Self::Infinite => Self::Infinite,
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u32> for Dimension {
    fn from(value: u32) -> Self {
        Self::Cells(value)
    }
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        Self::Cells(value as u32)
    }
}

impl Add for Dimension {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Cells(a), Self::Cells(b)) => Self::Cells(a.saturating_add(b)),
            _ => Self::Infinite,
        }
    }
}

impl Sub for Dimension {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Cells(a), Self::Cells(b)) => Self::Cells(a.saturating_sub(b)),
            _ => Self::Infinite,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cells(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str("Inf"),
        }
    }
}

// =============================================================================
// Size
// =============================================================================

/// Width and height, each possibly infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

impl Size {
    pub const ZERO: Self = Self {
        width: Dimension::ZERO,
        height: Dimension::ZERO,
    };

    pub const INFINITE: Self = Self {
        width: Dimension::Infinite,
        height: Dimension::Infinite,
    };

    /// Finite size in cells.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width: Dimension::Cells(width),
            height: Dimension::Cells(height),
        }
    }

    pub const fn square(value: u32) -> Self {
        Self::new(value, value)
    }

    pub fn has_infinite(&self) -> bool {
        self.width.is_infinite() || self.height.is_infinite()
    }

    pub fn has_zero(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }

    /// Finite `(width, height)`, or `None` if either axis is infinite.
    pub fn cells(&self) -> Option<(u32, u32)> {
        Some((self.width.cells()?, self.height.cells()?))
    }

    /// Clamp into `constraints`, axis by axis.
    pub fn constrain(&self, constraints: Constraints) -> Self {
        Self {
            width: self
                .width
                .max(constraints.min.width)
                .min(constraints.max.width),
            height: self
                .height
                .max(constraints.min.height)
                .min(constraints.max.height),
        }
    }

    /// Constraints that only this exact size satisfies.
    pub fn tight(self) -> Constraints {
        Constraints {
            min: self,
            max: self,
        }
    }

    /// Constraints that forbid anything larger than this size.
    pub fn loose(self) -> Constraints {
        Constraints {
            min: Self::ZERO,
            max: self,
        }
    }

    /// Grow by the given insets.
    pub fn add_insets(&self, insets: EdgeInsets) -> Self {
        Self {
            width: self.width.add_cells(insets.horizontal()),
            height: self.height.add_cells(insets.vertical()),
        }
    }

    /// Shrink by the given insets, or `None` if an axis would go negative.
    pub fn checked_sub_insets(&self, insets: EdgeInsets) -> Option<Self> {
        Some(Self {
            width: self.width.checked_sub(insets.horizontal())?,
            height: self.height.checked_sub(insets.vertical())?,
        })
    }

    /// Shrink by the given insets, saturating at zero.
    pub fn sub_insets(&self, insets: EdgeInsets) -> Self {
        Self {
            width: self.width.sub_cells(insets.horizontal()),
            height: self.height.sub_cells(insets.vertical()),
        }
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            width: self.width - rhs.width,
            height: self.height - rhs.height,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.width, self.height)
    }
}

// =============================================================================
// Pos
// =============================================================================

/// A cell position. Relative to a parent's origin unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// =============================================================================
// Constraints
// =============================================================================

/// A box of acceptable sizes: `min <= size <= max` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Constraints {
    pub min: Size,
    pub max: Size,
}

impl Constraints {
    pub const fn new(min: Size, max: Size) -> Self {
        Self { min, max }
    }

    /// No lower bound, unbounded above.
    pub const UNBOUNDED: Self = Self {
        min: Size::ZERO,
        max: Size::INFINITE,
    };

    /// Check whether `size` lies inside the box.
    pub fn is_satisfied_by(&self, size: Size) -> bool {
        self.min.width <= size.width
            && size.width <= self.max.width
            && self.min.height <= size.height
            && size.height <= self.max.height
    }

    pub fn is_tight(&self) -> bool {
        self.min == self.max
    }

    /// Same maximum, no minimum.
    pub fn loosen(&self) -> Self {
        Self {
            min: Size::ZERO,
            max: self.max,
        }
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min {}, max {}", self.min, self.max)
    }
}

// =============================================================================
// EdgeInsets
// =============================================================================

/// Space reserved on each side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeInsets {
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::all(0);

    pub const fn all(value: u32) -> Self {
        Self {
            top: value,
            left: value,
            right: value,
            bottom: value,
        }
    }

    pub const fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self {
            top: vertical,
            left: horizontal,
            right: horizontal,
            bottom: vertical,
        }
    }

    /// Total of left and right.
    pub const fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Total of top and bottom.
    pub const fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

impl fmt::Display for EdgeInsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{},{})",
            self.top, self.left, self.right, self.bottom
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
