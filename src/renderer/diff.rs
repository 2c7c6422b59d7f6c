//! Differential renderer for fullscreen mode.
//!
//! The DiffRenderer compares the current canvas to the previous one and only
//! outputs cells that have changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update block
//! 2. For each cell in the new canvas:
//!    - If the previous canvas has the same size and an equal cell: skip
//!    - Otherwise: move the cursor (if needed) and emit the cell, only
//!      re-sending colors/attributes/links that differ from the last cell
//! 3. Flush the batched output to the writer (single write)
//! 4. Store the canvas as previous for the next comparison
//!
//! # Cell mapping
//!
//! Colors with alpha below one half are drawn as the terminal default.
//! Hyperlinks are emitted as OSC 8 sequences.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};

use super::canvas::Canvas;
use crate::types::{Attr, Cell, Hyperlink, Rgba};

/// Alpha below which a color falls back to the terminal default.
const DEFAULT_COLOR_ALPHA: u8 = 0xFF / 2;

/// Map a cell color to a terminal color.
pub fn terminal_color(color: Rgba) -> Color {
    if color.a < DEFAULT_COLOR_ALPHA {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

// =============================================================================
// Pen - last emitted terminal state
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: Option<Attr>,
    link: Option<Hyperlink>,
    cursor: Option<(u16, u16)>,
}

// =============================================================================
// DiffRenderer
// =============================================================================

/// Differential renderer writing crossterm commands to `W`.
///
/// Keeps track of the previous canvas to enable diff-based rendering.
pub struct DiffRenderer<W: Write> {
    writer: W,
    output: Vec<u8>,
    pen: Pen,
    previous: Option<Canvas>,
}

impl<W: Write> DiffRenderer<W> {
    /// Create a new diff renderer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            output: Vec::with_capacity(16384),
            pen: Pen::default(),
            previous: None,
        }
    }

    /// Render a canvas, outputting only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render(&mut self, canvas: &Canvas) -> io::Result<bool> {
        let mut has_changes = false;

        queue!(self.output, BeginSynchronizedUpdate)?;
        // Terminal state may have been touched between frames
        self.pen = Pen::default();

        let previous = self
            .previous
            .take()
            .filter(|prev| prev.size() == canvas.size());

        for (x, y, cell) in canvas.iter() {
            let changed = match &previous {
                Some(prev) => prev.get(x, y) != Some(cell),
                None => true,
            };
            if changed {
                has_changes = true;
                self.render_cell(x as u16, y as u16, cell)?;
            }
        }

        if self.pen.link.is_some() {
            end_link(&mut self.output)?;
        }
        queue!(
            self.output,
            SetAttribute(Attribute::Reset),
            EndSynchronizedUpdate
        )?;

        self.writer.write_all(&self.output)?;
        self.writer.flush()?;
        self.output.clear();

        self.previous = Some(canvas.clone());
        Ok(has_changes)
    }

    fn render_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.pen.cursor != Some((x, y)) {
            queue!(self.output, MoveTo(x, y))?;
        }

        let attrs = cell.style.as_ref().map(|s| s.attrs).unwrap_or_default();
        if self.pen.attrs != Some(attrs) {
            // Resetting attributes also resets colors
            queue!(self.output, SetAttribute(Attribute::Reset))?;
            for attribute in attributes(attrs) {
                queue!(self.output, SetAttribute(attribute))?;
            }
            self.pen.attrs = Some(attrs);
            self.pen.fg = None;
            self.pen.bg = None;
        }

        let fg = terminal_color(cell.fg);
        if self.pen.fg != Some(fg) {
            queue!(self.output, SetForegroundColor(fg))?;
            self.pen.fg = Some(fg);
        }
        let bg = terminal_color(cell.bg);
        if self.pen.bg != Some(bg) {
            queue!(self.output, SetBackgroundColor(bg))?;
            self.pen.bg = Some(bg);
        }

        let link = cell.style.as_ref().and_then(|s| s.link.clone());
        if self.pen.link != link {
            match &link {
                Some(link) => start_link(&mut self.output, link)?,
                None => end_link(&mut self.output)?,
            }
            self.pen.link = link;
        }

        queue!(self.output, Print(cell.display_char()))?;
        self.pen.cursor = Some((x.saturating_add(1), y));
        Ok(())
    }

    /// Invalidate the previous canvas.
    ///
    /// Next render will be a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check if we have a previous canvas to diff against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Access the underlying writer (terminal setup writes go through it).
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

fn attributes(attrs: Attr) -> impl Iterator<Item = Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::BLINK, Attribute::SlowBlink),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(move |(flag, _)| attrs.contains(*flag))
    .map(|(_, attribute)| attribute)
}

fn start_link(out: &mut Vec<u8>, link: &Hyperlink) -> io::Result<()> {
    match &link.id {
        Some(id) => write!(out, "\x1b]8;id={};{}\x1b\\", id, link.url),
        None => write!(out, "\x1b]8;;{}\x1b\\", link.url),
    }
}

fn end_link(out: &mut Vec<u8>) -> io::Result<()> {
    out.write_all(b"\x1b]8;;\x1b\\")
}

// =============================================================================
// Tests
// =============================================================================
