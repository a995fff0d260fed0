//! `OutputBuffer`: Single-syscall ANSI presenter for a [`Surface`].
//!
//! All escape sequences for a frame are accumulated here, then flushed in a
//! single `write()` syscall to prevent terminal flickering. Attribute
//! sequences (colors, styles) are only emitted when they change between
//! adjacent tiles, so a settled board costs one SGR run per row.

use std::io::Write;

use crate::render::surface::{Rgb, Surface, Tile, TileStyle};

/// Pre-allocated buffer for building ANSI escape sequences.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical board frame (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        write!(self.data, "\x1b[{};{}H", y + 1, x + 1).unwrap();
    }

    /// Set foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b).unwrap();
    }

    /// Set background color (true color).
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b).unwrap();
    }

    /// Set style attributes. Always emits a reset first so that clearing a
    /// flag (bold off, say) does not require remembering SGR off-codes.
    pub fn set_style(&mut self, style: TileStyle) {
        self.data.extend_from_slice(b"\x1b[0");
        if style.contains(TileStyle::BOLD) {
            self.data.extend_from_slice(b";1");
        }
        if style.contains(TileStyle::DIM) {
            self.data.extend_from_slice(b";2");
        }
        if style.contains(TileStyle::UNDERLINE) {
            self.data.extend_from_slice(b";4");
        }
        if style.contains(TileStyle::REVERSED) {
            self.data.extend_from_slice(b";7");
        }
        self.data.push(b'm');
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Render a full surface at (x, y), batching attribute runs.
    pub fn draw_surface(&mut self, x: u16, y: u16, surface: &Surface) {
        let mut last: Option<Tile> = None;
        for row in 0..surface.height() {
            self.cursor_move(x, y + row);
            for tile in surface.row(row) {
                self.emit_attrs(*tile, last);
                let mut buf = [0u8; 4];
                self.write_str(tile.glyph.encode_utf8(&mut buf));
                last = Some(*tile);
            }
        }
        self.reset_attrs();
    }

    fn emit_attrs(&mut self, tile: Tile, last: Option<Tile>) {
        // set_style resets colors too, so re-emit them after a style change.
        let style_changed = last.map_or(true, |l| l.style != tile.style);
        if style_changed {
            self.set_style(tile.style);
        }
        if style_changed || last.map_or(true, |l| l.fg != tile.fg) {
            self.set_fg(tile.fg);
        }
        if style_changed || last.map_or(true, |l| l.bg != tile.bg) {
            self.set_bg(tile.bg);
        }
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_is_one_indexed() {
        let mut out = OutputBuffer::new();
        out.cursor_move(0, 0);
        assert_eq!(out.as_bytes(), b"\x1b[1;1H");
    }

    #[test]
    fn test_set_style_bold_dim() {
        let mut out = OutputBuffer::new();
        out.set_style(TileStyle::BOLD | TileStyle::DIM);
        assert_eq!(out.as_bytes(), b"\x1b[0;1;2m");
    }

    #[test]
    fn test_set_style_empty_is_reset() {
        let mut out = OutputBuffer::new();
        out.set_style(TileStyle::empty());
        assert_eq!(out.as_bytes(), b"\x1b[0m");
    }

    #[test]
    fn test_draw_surface_batches_attributes() {
        let mut surface = Surface::new(3, 1);
        let tile = Tile::new('A').with_fg(Rgb::WHITE);
        surface.set(0, 0, tile);
        surface.set(1, 0, Tile { glyph: 'B', ..tile });
        surface.set(2, 0, Tile { glyph: 'C', ..tile });

        let mut out = OutputBuffer::new();
        out.draw_surface(0, 0, &surface);

        let text = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        // One fg sequence for the whole run, not one per tile.
        assert_eq!(text.matches("38;2;255;255;255").count(), 1);
        assert!(text.contains("ABC"));
    }

    #[test]
    fn test_draw_surface_re_emits_colors_after_style_change() {
        let mut surface = Surface::new(2, 1);
        let plain = Tile::new('A').with_fg(Rgb::WHITE);
        surface.set(0, 0, plain);
        surface.set(1, 0, plain.with_style(TileStyle::BOLD));

        let mut out = OutputBuffer::new();
        out.draw_surface(0, 0, &surface);

        let text = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert_eq!(text.matches("38;2;255;255;255").count(), 2);
    }

    #[test]
    fn test_flush_to_writer() {
        let mut out = OutputBuffer::new();
        out.write_str("hello");
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello");
    }
}
