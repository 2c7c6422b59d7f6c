//! Text primitive - displays lines of text.
//!
//! Lines are split on `'\n'`. The natural size is the longest line by the
//! number of lines, constrained into the incoming box; anything outside the
//! resolved size is clipped when painting.

use crate::engine::{LayoutContext, PaintContext, RenderWidget, Widget};
use crate::error::Result;
use crate::layout::Size;
use crate::types::{Attr, Rgba, TextStyle};

/// A block of unwrapped text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub content: String,
    /// Transparent means the terminal default.
    pub fg: Rgba,
    pub style: Option<TextStyle>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_fg(mut self, fg: Rgba) -> Self {
        self.fg = fg;
        self
    }

    pub fn with_style(mut self, style: impl Into<TextStyle>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn bold(self) -> Self {
        let attrs = self.style.as_ref().map_or(Attr::NONE, |s| s.attrs) | Attr::BOLD;
        let link = self.style.as_ref().and_then(|s| s.link.clone());
        self.with_style(TextStyle { attrs, link })
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// `(longest line, line count)` in cells.
    pub fn measure(&self) -> (u32, u32) {
        self.lines().fold((0, 0), |(width, height), line| {
            let len = u32::try_from(line.chars().count()).unwrap_or(u32::MAX);
            (width.max(len), height + 1)
        })
    }
}

impl RenderWidget for Text {
    fn layout(&self, ctx: &mut LayoutContext) -> Result<Size> {
        let (width, height) = self.measure();
        Ok(Size::new(width, height).constrain(ctx.constraints()))
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) -> Result<()> {
        let height = ctx.height();
        let canvas = ctx.canvas();
        for (row, line) in (0..height).zip(self.lines()) {
            canvas.print(0, row, line, self.fg, self.style.as_ref());
        }
        Ok(())
    }
}

impl From<Text> for Widget {
    fn from(text: Text) -> Self {
        Widget::render(text)
    }
}

impl From<&str> for Widget {
    fn from(content: &str) -> Self {
        Widget::render(Text::new(content))
    }
}

impl From<String> for Widget {
    fn from(content: String) -> Self {
        Widget::render(Text::new(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ElementTree;
    use crate::layout::Constraints;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_measure() {
        assert_eq!(Text::new("").measure(), (0, 1));
        assert_eq!(Text::new("abc").measure(), (3, 1));
        assert_eq!(Text::new("ab\nwxyz\n").measure(), (4, 3));
    }

    #[test]
    fn test_text_fills_tight_viewport() {
        let mut tree = ElementTree::new();
        let canvas = tree
            .frame(&Text::new("hi\nthere").into(), Size::new(4, 3))
            .unwrap();
        assert_eq!(canvas.to_lines(), vec!["hi  ", "ther", "    "]);
    }

    #[test]
    fn test_text_natural_size_under_loose_constraints() {
        let mut tree = ElementTree::new();
        tree.reconcile(&Text::new("hello\nyo").into(), Size::new(20, 20).loose())
            .unwrap();
        assert_eq!(tree.root().size(), Size::new(5, 2));
    }

    #[test]
    fn test_text_clamped_to_max() {
        let mut tree = ElementTree::new();
        tree.reconcile(
            &Text::new("hello").into(),
            Constraints::new(Size::ZERO, Size::new(3, 1)),
        )
        .unwrap();
        assert_eq!(tree.root().size(), Size::new(3, 1));
        assert_eq!(tree.render().unwrap().to_lines(), vec!["hel"]);
    }

    #[test]
    fn test_text_style_applied() {
        let mut tree = ElementTree::new();
        let canvas = tree
            .frame(&Text::new("a").with_fg(Rgba::RED).bold().into(), Size::new(1, 1))
            .unwrap();
        let cell = canvas.get(0, 0).cloned().unwrap_or_default();
        assert_eq!(cell.fg, Rgba::RED);
        assert_eq!(cell.style.map(|s| s.attrs), Some(Attr::BOLD));
    }
}
