//! # Flapboard
//!
//! A split-flap departure board engine for terminal UIs.
//!
//! Flapboard animates text the way a Solari board does: every cell flips
//! forward through its alphabet, one glyph per tick, until it lands on its
//! target. Rows reveal one after another with a stagger, values update
//! mid-flight without resetting, and the whole thing is driven by a caller
//! clock so it stays deterministic under test.
//!
//! ## Core Concepts
//!
//! - **Forward-only cursors**: A cell never flips backward; reaching an
//!   earlier glyph means going the long way around
//! - **Poll-driven scheduling**: [`Board::advance`] is called with `now`;
//!   no background threads own board state
//! - **Snapshot rendering**: Each frame is a pure function of a
//!   [`BoardSnapshot`], drawn via [`BoardView`] and [`OutputBuffer`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use flapboard::{Board, BoardConfig, RowSpec};
//! use std::time::Instant;
//!
//! let placeholder = vec![RowSpec::new(" LOADING...").with_length(12)];
//! let mut board = Board::new(placeholder, BoardConfig::default(), Instant::now())?;
//!
//! board.update(vec![RowSpec::new("AMSTERDAM").with_length(12)], Instant::now())?;
//! board.feed_ready(Instant::now());
//!
//! // Each frame:
//! board.advance(Instant::now());
//! let snapshot = board.snapshot();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod alphabet;
pub mod board;
pub mod error;
pub mod flap;
pub mod render;
pub mod timer;

// Re-exports for convenience
pub use alphabet::Alphabet;
pub use board::{
    Board, BoardConfig, BoardSnapshot, FeedStatus, RevealSequencer, RevealState, RowSnapshot,
};
pub use error::BoardError;
pub use flap::{CellSnapshot, FlapCursor, FlapRow, HoverPreview, PadSide, RowSpec};
pub use render::{BoardView, OutputBuffer, Rgb, Surface, Tile, TileStyle};
pub use timer::{Scheduler, TaskHandle, Tick, Ticker};
