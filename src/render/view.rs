//! BoardView: Draws a board snapshot onto a surface.
//!
//! Each board row becomes a block of terminal rows: the top halves of its
//! cells, an optional hinge line, and the bottom halves. The transition
//! phase of every cell maps to a style, not to timing: advancing cells draw
//! their top half dim (the new glyph still arriving), the settling tick
//! draws it bold (the flap-down flourish), and a raised hover preview draws
//! the bottom half reversed. All of that comes straight from the snapshot;
//! the view holds no animation state of its own.

use unicode_width::UnicodeWidthStr;

use crate::board::{BoardSnapshot, RowSnapshot};
use crate::flap::{compose, Overlay};
use crate::render::surface::{Rgb, Surface, Tile, TileStyle};

/// Color of the hinge line.
const HINGE: Rgb = Rgb::from_u32(0x3a3a3a);

/// Stateless renderer from [`BoardSnapshot`] to [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardView {
    origin_x: u16,
    origin_y: u16,
    /// Columns between adjacent cells.
    gap: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView {
    /// Create a view drawing at the surface origin with a one-column gap.
    pub const fn new() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            gap: 1,
        }
    }

    /// Set the top-left corner the board is drawn at.
    #[must_use]
    pub const fn with_origin(mut self, x: u16, y: u16) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Set the gap between cells.
    #[must_use]
    pub const fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    /// The (width, height) in terminal cells this snapshot needs.
    pub fn required_size(&self, snapshot: &BoardSnapshot) -> (u16, u16) {
        let mut width = 0u16;
        let mut height = 0u16;
        for row in &snapshot.rows {
            width = width.max(self.row_width(row));
            height += Self::row_height(row) + 1;
        }
        height = height.saturating_sub(1); // no trailing blank line
        (
            self.origin_x.saturating_add(width),
            self.origin_y.saturating_add(height),
        )
    }

    /// Draw the snapshot. Tiles outside the surface are clipped.
    pub fn render(&self, snapshot: &BoardSnapshot, surface: &mut Surface) {
        let mut y = self.origin_y;
        for row in &snapshot.rows {
            self.render_row(row, surface, y);
            y += Self::row_height(row) + 1;
        }
    }

    fn render_row(&self, row: &RowSnapshot, surface: &mut Surface, y: u16) {
        let cell_width = Self::cell_width(row);
        let (fg, bg) = row.accent.map_or((Rgb::INK, Rgb::FACE), |accent| {
            (Rgb::WHITE, accent)
        });

        let bottom_y = if row.hinge { y + 2 } else { y + 1 };
        let mut x = self.origin_x;
        for cell in &row.cells {
            let visual = compose(cell);

            let top_style = match visual.overlay {
                Some(Overlay::MidFlip(_)) => TileStyle::DIM,
                Some(Overlay::FlapDown(_)) => TileStyle::BOLD,
                None => TileStyle::empty(),
            };
            // The bottom half still shows the old glyph until the flap
            // covering it has fallen.
            let bottom_text = match &visual.overlay {
                Some(Overlay::MidFlip(_)) => &visual.bottom,
                _ => &visual.top,
            };
            let (bottom_text, bottom_style) = visual.preview.as_ref().map_or(
                (bottom_text, TileStyle::empty()),
                |glyph| (glyph, TileStyle::REVERSED),
            );

            let template = Tile::new(' ').with_fg(fg).with_bg(bg);
            Self::draw_cell(
                surface,
                x,
                y,
                cell_width,
                &visual.top,
                template.with_style(top_style),
            );
            Self::draw_cell(
                surface,
                x,
                bottom_y,
                cell_width,
                bottom_text,
                template.with_style(bottom_style),
            );
            x += cell_width + self.gap;
        }

        if row.hinge {
            let width = self.row_width(row);
            let hinge_tile = Tile::new('─').with_fg(HINGE).with_bg(bg);
            for i in 0..width {
                surface.set(self.origin_x + i, y + 1, hinge_tile);
            }
        }
    }

    /// Draw one half of a cell, padded to the cell width.
    fn draw_cell(
        surface: &mut Surface,
        x: u16,
        y: u16,
        cell_width: u16,
        text: &str,
        template: Tile,
    ) {
        let used = surface.draw_text(x, y, text, template);
        for i in used..cell_width {
            surface.set(x + i, y, template);
        }
    }

    /// Cells are uniform within a row and sized to the widest glyph, so a
    /// words-mode token gets room to flip in place.
    fn cell_width(row: &RowSnapshot) -> u16 {
        row.cells
            .iter()
            .map(|c| c.current.width().max(c.previous.width()))
            .max()
            .unwrap_or(1)
            .max(1)
            .try_into()
            .unwrap_or(u16::MAX)
    }

    fn row_width(&self, row: &RowSnapshot) -> u16 {
        let cells = u16::try_from(row.cells.len()).unwrap_or(u16::MAX);
        if cells == 0 {
            return 0;
        }
        cells * Self::cell_width(row) + self.gap * (cells - 1)
    }

    const fn row_height(row: &RowSnapshot) -> u16 {
        if row.hinge {
            3
        } else {
            2
        }
    }
}
