//! Flex distribution math.
//!
//! The [`Flex`](crate::primitives::Flex) container lays its children out in two
//! passes. The first measures every child against the space left over on the
//! main axis. The second places them. This module holds the placement half
//! as pure functions so it can be checked without a tree.
//!
//! # Main axis
//!
//! Given the leftover space `r` and `n` children:
//!
//! | alignment       | first offset | gap between children |
//! |-----------------|--------------|----------------------|
//! | `Start`         | 0            | 0                    |
//! | `End`           | r            | 0                    |
//! | `Center`        | r / 2        | 0                    |
//! | `SpaceBetween`  | 0            | r / (n - 1)          |
//! | `SpaceAround`   | gap / 2      | r / n                |
//! | `SpaceEvenly`   | gap          | r / (n + 1)          |
//!
//! `SpaceBetween` with a single child has no divisor and is placed like
//! `Start`.

use super::geometry::{Dimension, Pos, Size};

// =============================================================================
// Axis
// =============================================================================

/// Direction children are stacked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    /// Extent of `size` along this axis.
    #[inline]
    pub fn main(self, size: Size) -> Dimension {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` across this axis.
    #[inline]
    pub fn cross(self, size: Size) -> Dimension {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Build a size from main and cross extents.
    #[inline]
    pub fn size(self, main: Dimension, cross: Dimension) -> Size {
        match self {
            Self::Horizontal => Size {
                width: main,
                height: cross,
            },
            Self::Vertical => Size {
                width: cross,
                height: main,
            },
        }
    }

    /// Build a position from main and cross offsets.
    #[inline]
    pub fn pos(self, main: u32, cross: u32) -> Pos {
        let saturate = |offset: u32| i32::try_from(offset).unwrap_or(i32::MAX);
        let (main, cross) = (saturate(main), saturate(cross));
        match self {
            Self::Horizontal => Pos::new(main, cross),
            Self::Vertical => Pos::new(cross, main),
        }
    }
}

// =============================================================================
// Alignment
// =============================================================================

/// How leftover main-axis space is distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MainAxisAlignment {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// How children are placed across the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrossAxisAlignment {
    #[default]
    Start,
    End,
    Center,
    /// Children are offered a tight cross extent equal to the container's.
    Stretch,
}

// =============================================================================
// Placement
// =============================================================================

/// Leading offset and inter-child gap for `count` children sharing
/// `remaining` spare cells.
pub fn main_axis_spacing(alignment: MainAxisAlignment, remaining: u32, count: usize) -> (u32, u32) {
    let n = count as u32;
    match alignment {
        MainAxisAlignment::Start => (0, 0),
        MainAxisAlignment::End => (remaining, 0),
        MainAxisAlignment::Center => (remaining / 2, 0),
        MainAxisAlignment::SpaceBetween if n > 1 => (0, remaining / (n - 1)),
        MainAxisAlignment::SpaceBetween => (0, 0),
        MainAxisAlignment::SpaceAround if n > 0 => {
            let gap = remaining / n;
            (gap / 2, gap)
        }
        MainAxisAlignment::SpaceEvenly if n > 0 => {
            let gap = remaining / (n + 1);
            (gap, gap)
        }
        MainAxisAlignment::SpaceAround | MainAxisAlignment::SpaceEvenly => (0, 0),
    }
}

/// Main-axis offset of every child, in order.
///
/// `extents` are the children's resolved main-axis sizes and `remaining` is
/// the container's final main extent minus their sum.
pub fn main_axis_offsets(alignment: MainAxisAlignment, remaining: u32, extents: &[u32]) -> Vec<u32> {
    let (mut offset, gap) = main_axis_spacing(alignment, remaining, extents.len());
    extents
        .iter()
        .map(|&extent| {
            let at = offset;
            offset = offset.saturating_add(extent).saturating_add(gap);
            at
        })
        .collect()
}

/// Cross-axis offset of one child inside a container `final_cross` wide.
pub fn cross_axis_offset(alignment: CrossAxisAlignment, final_cross: u32, child_cross: u32) -> u32 {
    let spare = final_cross.saturating_sub(child_cross);
    match alignment {
        CrossAxisAlignment::Start | CrossAxisAlignment::Stretch => 0,
        CrossAxisAlignment::End => spare,
        CrossAxisAlignment::Center => spare / 2,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_between_three_children() {
        // extents 2+3+4 = 9 in 19 cells: 10 spare, gap 5
        let offsets = main_axis_offsets(MainAxisAlignment::SpaceBetween, 10, &[2, 3, 4]);
        assert_eq!(offsets, vec![0, 7, 15]);
    }

    #[test]
    fn test_space_between_single_child_is_start() {
        assert_eq!(main_axis_spacing(MainAxisAlignment::SpaceBetween, 10, 1), (0, 0));
        assert_eq!(main_axis_offsets(MainAxisAlignment::SpaceBetween, 10, &[4]), vec![0]);
    }

    #[test]
    fn test_no_children_places_nothing() {
        for alignment in [
            MainAxisAlignment::SpaceBetween,
            MainAxisAlignment::SpaceAround,
            MainAxisAlignment::SpaceEvenly,
        ] {
            assert!(main_axis_offsets(alignment, 10, &[]).is_empty());
        }
    }

    #[test]
    fn test_simple_alignments() {
        let extents = [2, 2];
        assert_eq!(main_axis_offsets(MainAxisAlignment::Start, 6, &extents), vec![0, 2]);
        assert_eq!(main_axis_offsets(MainAxisAlignment::End, 6, &extents), vec![6, 8]);
        assert_eq!(main_axis_offsets(MainAxisAlignment::Center, 6, &extents), vec![3, 5]);
    }

    #[test]
    fn test_space_around_and_evenly() {
        // 2 children, 6 spare
        // around: gap 3, lead 1
        assert_eq!(
            main_axis_offsets(MainAxisAlignment::SpaceAround, 6, &[2, 2]),
            vec![1, 6]
        );
        // evenly: gap 2, lead 2
        assert_eq!(
            main_axis_offsets(MainAxisAlignment::SpaceEvenly, 6, &[2, 2]),
            vec![2, 6]
        );
    }

    #[test]
    fn test_cross_axis_offsets() {
        assert_eq!(cross_axis_offset(CrossAxisAlignment::Start, 10, 4), 0);
        assert_eq!(cross_axis_offset(CrossAxisAlignment::End, 10, 4), 6);
        assert_eq!(cross_axis_offset(CrossAxisAlignment::Center, 10, 4), 3);
        assert_eq!(cross_axis_offset(CrossAxisAlignment::Stretch, 10, 10), 0);
    }

    #[test]
    fn test_axis_mapping() {
        let size = Size::new(7, 3);
        assert_eq!(Axis::Horizontal.main(size), Dimension::Cells(7));
        assert_eq!(Axis::Vertical.main(size), Dimension::Cells(3));
        assert_eq!(Axis::Vertical.cross(size), Dimension::Cells(7));
        assert_eq!(
            Axis::Vertical.size(Dimension::Cells(3), Dimension::Cells(7)),
            size
        );
        assert_eq!(Axis::Horizontal.pos(4, 1), Pos::new(4, 1));
        assert_eq!(Axis::Vertical.pos(4, 1), Pos::new(1, 4));
    }

    #[test]
    fn test_pos_saturates_past_infinite_extent() {
        assert_eq!(Axis::Horizontal.pos(u32::MAX, 2), Pos::new(i32::MAX, 2));
        assert_eq!(Axis::Vertical.pos(u32::MAX, u32::MAX), Pos::new(i32::MAX, i32::MAX));

        let offsets = main_axis_offsets(MainAxisAlignment::Start, 0, &[u32::MAX, 1]);
        assert_eq!(Axis::Vertical.pos(offsets[1], 0), Pos::new(0, i32::MAX));
    }
}
