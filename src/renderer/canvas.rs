//! Canvas and compositing primitives.
//!
//! A [`Canvas`] is a 2D grid of [`Cell`]s with a fixed, finite size. Widgets
//! paint into one, and the compositor stacks children's canvases over their
//! parent's with [`Canvas::overlay`].
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Finite only**: a canvas cannot exist for an infinite size.
//!   [`Canvas::for_size`] returns `None` instead.
//! - **Blending on overlay**: painting writes cells as-is; only overlaying
//!   blends, so a widget's own canvas is never pre-mixed with its parent.
//! - **Clipping**: writes and overlays that fall outside the grid are dropped.

use crate::layout::{Pos, Size};
use crate::types::{Cell, Rgba, TextStyle};

// =============================================================================
// Canvas
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Canvas {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Create a canvas filled with default (fully transparent) cells.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    /// Create a canvas for `size`, or `None` if either axis is infinite.
    pub fn for_size(size: Size) -> Option<Self> {
        let (width, height) = size.cells()?;
        Some(Self::new(width, height))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if coordinates are in bounds.
    #[inline]
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference (returns None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Replace a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Raw cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Cell)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            ((i % width) as u32, (i / width) as u32, cell)
        })
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Visit every in-bounds cell of a rectangle.
    fn for_each_in_rect(&mut self, x: u32, y: u32, width: u32, height: u32, mut f: impl FnMut(&mut Cell)) {
        let x2 = x.saturating_add(width).min(self.width);
        let y2 = y.saturating_add(height).min(self.height);
        for row in y..y2 {
            for col in x..x2 {
                let idx = self.index(col, row);
                f(&mut self.cells[idx]);
            }
        }
    }

    /// Set the background of a rectangle.
    pub fn fill_background(&mut self, x: u32, y: u32, width: u32, height: u32, bg: Rgba) {
        self.for_each_in_rect(x, y, width, height, |cell| cell.bg = bg);
    }

    /// Set the foreground of a rectangle.
    pub fn fill_foreground(&mut self, x: u32, y: u32, width: u32, height: u32, fg: Rgba) {
        self.for_each_in_rect(x, y, width, height, |cell| cell.fg = fg);
    }

    /// Write `text` on one row starting at `(x, y)`, clipped to the canvas.
    ///
    /// Only the character, foreground and style are written; the background
    /// is left as it is. Returns the number of cells written.
    pub fn print(&mut self, x: u32, y: u32, text: &str, fg: Rgba, style: Option<&TextStyle>) -> u32 {
        let mut written = 0;
        for (col, ch) in (x..).zip(text.chars()) {
            let Some(cell) = self.get_mut(col, y) else {
                break;
            };
            cell.ch = Some(ch);
            cell.fg = fg;
            cell.style = style.cloned();
            written += 1;
        }
        written
    }

    /// Blend every cell of `top` onto this canvas with its origin at `at`.
    ///
    /// Cells of `top` that land outside this canvas are dropped.
    pub fn overlay(&mut self, at: Pos, top: &Canvas) {
        for (tx, ty, top_cell) in top.iter() {
            let x = at.x as i64 + tx as i64;
            let y = at.y as i64 + ty as i64;
            if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                continue;
            }
            let idx = self.index(x as u32, y as u32);
            let blended = Cell::blend(&self.cells[idx], top_cell);
            self.cells[idx] = blended;
        }
    }

    /// Characters row by row, with the sentinel shown as a blank.
    pub fn to_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .take(self.height as usize)
            .map(|row| row.iter().map(Cell::display_char).collect())
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Dimension;
    use crate::types::Attr;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canvas_cell_count_matches_size() {
        let canvas = Canvas::new(7, 3);
        assert_eq!(canvas.cells().len(), 21);
        assert_eq!(canvas.size(), Size::new(7, 3));
        assert!(canvas.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn test_for_size_rejects_infinite() {
        let size = Size {
            width: Dimension::Cells(3),
            height: Dimension::Infinite,
        };
        assert!(Canvas::for_size(size).is_none());
        assert!(Canvas::for_size(Size::new(3, 2)).is_some());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let mut canvas = Canvas::new(2, 2);
        assert!(canvas.get(2, 0).is_none());
        assert!(canvas.get_mut(0, 2).is_none());
        canvas.set(5, 5, Cell::from_char('x'));
        assert_eq!(canvas.to_lines(), vec!["  ", "  "]);
    }

    #[test]
    fn test_print_clips() {
        let mut canvas = Canvas::new(4, 1);
        let written = canvas.print(1, 0, "hello", Rgba::WHITE, None);
        assert_eq!(written, 3);
        assert_eq!(canvas.to_lines(), vec![" hel"]);
        assert_eq!(canvas.get(1, 0).map(|c| c.fg), Some(Rgba::WHITE));
    }

    #[test]
    fn test_print_keeps_background() {
        let mut canvas = Canvas::new(2, 1);
        canvas.fill_background(0, 0, 2, 1, Rgba::RED);
        canvas.print(0, 0, "ab", Rgba::WHITE, Some(&TextStyle::new(Attr::BOLD)));
        let cell = canvas.get(0, 0).cloned().unwrap_or_default();
        assert_eq!(cell.bg, Rgba::RED);
        assert_eq!(cell.style.map(|s| s.attrs), Some(Attr::BOLD));
    }

    #[test]
    fn test_overlay_blends_region() {
        let mut bottom = Canvas::new(4, 3);
        bottom.fill_background(0, 0, 4, 3, Rgba::RED);
        bottom.print(0, 1, "abcd", Rgba::WHITE, None);

        let mut top = Canvas::new(2, 2);
        top.fill_background(0, 0, 2, 2, Rgba::BLUE);
        top.set(1, 0, Cell::from_char('Z').with_bg(Rgba::BLUE));

        bottom.overlay(Pos::new(1, 0), &top);

        assert_eq!(bottom.to_lines(), vec!["  Z ", "abcd", "    "]);
        assert_eq!(bottom.get(0, 0).map(|c| c.bg), Some(Rgba::RED));
        assert_eq!(bottom.get(1, 0).map(|c| c.bg), Some(Rgba::BLUE));
        // sentinel char keeps the 'b' underneath, background is replaced
        assert_eq!(bottom.get(1, 1).map(|c| (c.ch, c.bg)), Some((Some('b'), Rgba::BLUE)));
        assert_eq!(bottom.get(3, 0).map(|c| c.bg), Some(Rgba::RED));
    }

    #[test]
    fn test_overlay_clips_outside() {
        let mut bottom = Canvas::new(2, 2);
        let mut top = Canvas::new(2, 2);
        top.print(0, 0, "xy", Rgba::WHITE, None);
        top.print(0, 1, "zw", Rgba::WHITE, None);

        bottom.overlay(Pos::new(-1, 1), &top);
        assert_eq!(bottom.to_lines(), vec!["  ", "y "]);
    }

    #[test]
    fn test_overlay_transparent_is_identity() {
        let mut bottom = Canvas::new(3, 1);
        bottom.fill_background(0, 0, 3, 1, Rgba::GREEN);
        bottom.print(0, 0, "abc", Rgba::BLACK, None);
        let before = bottom.clone();

        bottom.overlay(Pos::ORIGIN, &Canvas::new(3, 1));
        assert_eq!(bottom, before);
    }
}
