//! Render module: From board snapshot to terminal bytes.
//!
//! The pipeline has three stages, each independently testable:
//! - [`Surface`]: a plain tile grid ([`Tile`], [`Rgb`], [`TileStyle`])
//! - [`BoardView`]: draws a [`BoardSnapshot`](crate::board::BoardSnapshot)
//!   onto a surface, mapping transition phases to styles
//! - [`OutputBuffer`]: turns a surface into one batched ANSI write
//!
//! Nothing here mutates board state; a frame is a pure function of the
//! snapshot taken after [`Board::advance`](crate::board::Board::advance).

mod output;
mod surface;
mod view;

pub use output::OutputBuffer;
pub use surface::{Rgb, Surface, Tile, TileStyle};
pub use view::BoardView;
