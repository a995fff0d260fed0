//! Surface: A small tile grid the board view draws into.
//!
//! Unlike a general compositor cell, a tile here is deliberately plain: one
//! `char`, two colors, a style byte. Split-flap boards draw a fixed, known
//! glyph set, so there is no grapheme spill-over or wide-character
//! continuation machinery to carry.

use bitflags::bitflags;

/// True-color RGB.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., `0xFFA500`).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// The dark face of a flap.
    pub const FACE: Self = Self::from_u32(0x1a1a1a);
    /// The pale ink printed on a flap.
    pub const INK: Self = Self::from_u32(0xe1e1e1);
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<u32> for Rgb {
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

bitflags! {
    /// Tile style attributes.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileStyle: u8 {
        /// Bold text.
        const BOLD = 0b0000_0001;
        /// Dim/faint text.
        const DIM = 0b0000_0010;
        /// Reversed colors (fg/bg swapped).
        const REVERSED = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE = 0b0000_1000;
    }
}

impl std::fmt::Debug for TileStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// One drawn character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// The character shown.
    pub glyph: char,
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
    /// Style attributes.
    pub style: TileStyle,
}

impl Tile {
    /// A blank tile in board colors.
    pub const BLANK: Self = Self {
        glyph: ' ',
        fg: Rgb::INK,
        bg: Rgb::BLACK,
        style: TileStyle::empty(),
    };

    /// Create a tile with the given glyph and default board colors.
    #[inline]
    pub const fn new(glyph: char) -> Self {
        Self {
            glyph,
            fg: Rgb::INK,
            bg: Rgb::BLACK,
            style: TileStyle::empty(),
        }
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Set the style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: TileStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::BLANK
    }
}

/// A width x height grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u16,
    height: u16,
    tiles: Vec<Tile>,
}

impl Surface {
    /// Create a blank surface.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    /// Surface width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Surface height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get a tile. Out-of-bounds reads return a blank tile.
    pub fn get(&self, x: u16, y: u16) -> Tile {
        self.index(x, y)
            .map_or(Tile::BLANK, |idx| self.tiles[idx])
    }

    /// Set a tile. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, tile: Tile) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    /// Reset every tile to blank.
    pub fn clear(&mut self) {
        self.tiles.fill(Tile::BLANK);
    }

    /// Resize, dropping all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.tiles = vec![Tile::BLANK; usize::from(width) * usize::from(height)];
    }

    /// Draw a string starting at (x, y), advancing by display width.
    /// Returns the number of columns used.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, template: Tile) -> u16 {
        let mut col = x;
        for c in text.chars() {
            let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if width == 0 {
                continue;
            }
            if col >= self.width {
                break;
            }
            self.set(col, y, Tile { glyph: c, ..template });
            col += u16::try_from(width).unwrap_or(1);
        }
        col - x
    }

    /// One row of tiles, for presenters.
    pub fn row(&self, y: u16) -> &[Tile] {
        self.index(0, y).map_or(&[], |start| {
            &self.tiles[start..start + usize::from(self.width)]
        })
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        let amber = Rgb::from_u32(0xFFA500);
        assert_eq!(amber, Rgb::new(255, 165, 0));
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut surface = Surface::new(4, 2);
        let tile = Tile::new('A').with_fg(Rgb::WHITE);
        surface.set(3, 1, tile);
        assert_eq!(surface.get(3, 1), tile);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut surface = Surface::new(2, 2);
        surface.set(5, 5, Tile::new('X'));
        assert_eq!(surface.get(5, 5), Tile::BLANK);
    }

    #[test]
    fn test_draw_text_advances_by_width() {
        let mut surface = Surface::new(10, 1);
        let used = surface.draw_text(0, 0, "AB", Tile::BLANK);
        assert_eq!(used, 2);
        assert_eq!(surface.get(0, 0).glyph, 'A');
        assert_eq!(surface.get(1, 0).glyph, 'B');
    }

    #[test]
    fn test_draw_text_clips_at_edge() {
        let mut surface = Surface::new(3, 1);
        surface.draw_text(0, 0, "HELLO", Tile::BLANK);
        assert_eq!(surface.get(2, 0).glyph, 'L');
    }

    #[test]
    fn test_row_slice() {
        let mut surface = Surface::new(3, 2);
        surface.set(0, 1, Tile::new('Z'));
        assert_eq!(surface.row(1)[0].glyph, 'Z');
        assert_eq!(surface.row(9), &[] as &[Tile]);
    }

    #[test]
    fn test_clear() {
        let mut surface = Surface::new(2, 1);
        surface.set(0, 0, Tile::new('Q'));
        surface.clear();
        assert_eq!(surface.get(0, 0), Tile::BLANK);
    }
}
