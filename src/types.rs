//! Core cell types for cellwright.
//!
//! These types are what every painted canvas is made of. Widgets paint them,
//! the compositor blends them, and the backend turns them into terminal output.

use std::fmt;
use std::sync::Arc;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with straight (non-premultiplied) 8-bit channels.
///
/// Alpha 255 = fully opaque, 0 = fully transparent. A transparent color is
/// also what "nothing painted here" looks like, which is why `Default` is
/// [`Rgba::TRANSPARENT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Composite `top` over `bottom` (Porter-Duff "over", straight alpha).
    ///
    /// ```text
    /// out_a = top_a + bottom_a * (255 - top_a) / 255
    /// out_c = (top_c * top_a + bottom_c * bottom_a * (255 - top_a) / 255) / out_a
    /// ```
    ///
    /// An opaque `top` wins outright and a transparent `top` leaves `bottom`
    /// untouched.
    ///
    /// ```
    /// use cellwright::types::Rgba;
    ///
    /// let bottom = Rgba::RED;
    /// assert_eq!(Rgba::blend(bottom, Rgba::TRANSPARENT), bottom);
    /// assert_eq!(Rgba::blend(bottom, Rgba::BLUE), Rgba::BLUE);
    /// ```
    #[inline]
    pub fn blend(bottom: Self, top: Self) -> Self {
        // Fast paths
        if top.is_opaque() {
            return top;
        }
        if top.is_transparent() {
            return bottom;
        }

        let ta = top.a as u32;
        let inv_ta = 255 - ta;
        let ba = bottom.a as u32;

        // Never zero: ta is in 1..=254 here.
        let out_a = ta + ba * inv_ta / 255;

        let channel = |bc: u8, tc: u8| -> u8 {
            let value = (tc as u32 * ta + bc as u32 * ba * inv_ta / 255) / out_a;
            value.min(255) as u8
        };

        Self {
            r: channel(bottom.r, top.r),
            g: channel(bottom.g, top.g),
            b: channel(bottom.b, top.b),
            a: out_a.min(255) as u8,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const STRIKETHROUGH = 1 << 5;
    }
}

// =============================================================================
// Text Style
// =============================================================================

/// Hyperlink target attached to a run of cells (OSC 8).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    pub url: Arc<str>,
    /// Cells sharing an id are treated as one link by the terminal.
    pub id: Option<Arc<str>>,
}

impl Hyperlink {
    pub fn new(url: impl Into<Arc<str>>) -> Self {
        Self {
            url: url.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Text style record carried by a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub attrs: Attr,
    pub link: Option<Hyperlink>,
}

impl TextStyle {
    pub fn new(attrs: Attr) -> Self {
        Self { attrs, link: None }
    }

    pub fn with_link(mut self, link: Hyperlink) -> Self {
        self.link = Some(link);
        self
    }
}

impl From<Attr> for TextStyle {
    fn from(attrs: Attr) -> Self {
        Self::new(attrs)
    }
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// A single terminal cell.
///
/// `ch == None` and `style == None` are "no override" sentinels: when this
/// cell is blended over another one, the character and style underneath
/// show through while the colors still blend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// Displayed character, or `None` to keep what is below.
    pub ch: Option<char>,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Text style, or `None` to keep what is below.
    pub style: Option<TextStyle>,
}

impl Cell {
    /// A cell showing `ch` with no color of its own.
    pub fn from_char(ch: char) -> Self {
        Self {
            ch: Some(ch),
            ..Self::default()
        }
    }

    pub fn with_fg(mut self, fg: Rgba) -> Self {
        self.fg = fg;
        self
    }

    pub fn with_bg(mut self, bg: Rgba) -> Self {
        self.bg = bg;
        self
    }

    pub fn with_style(mut self, style: impl Into<TextStyle>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Character to display, substituting a blank for the sentinel.
    #[inline]
    pub fn display_char(&self) -> char {
        self.ch.unwrap_or(' ')
    }

    /// Composite `top` over `bottom`.
    ///
    /// Colors blend with [`Rgba::blend`]. Character and style come from `top`
    /// unless it carries the no-override sentinel.
    pub fn blend(bottom: &Self, top: &Self) -> Self {
        Self {
            ch: top.ch.or(bottom.ch),
            fg: Rgba::blend(bottom.fg, top.fg),
            bg: Rgba::blend(bottom.bg, top.bg),
            style: top.style.clone().or_else(|| bottom.style.clone()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
