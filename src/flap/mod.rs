//! Flap module: Per-cell animation core.
//!
//! This module contains:
//! - [`FlapCursor`]: the forward-only transition state machine for one cell
//! - [`CellSnapshot`] / [`compose`] / [`DigitVisual`]: the pure mapping from
//!   cursor state to flap sub-elements
//! - [`HoverPreview`]: the interactive half-flap sub-state
//! - [`RowSpec`] / [`format_targets`] / [`FlapRow`]: row configuration,
//!   formatting, and the live row that schedules cell ticks

mod cursor;
mod digit;
mod row;

pub use cursor::{FlapCursor, Retarget, Step};
pub use digit::{compose, CellSnapshot, DigitVisual, HoverPreview, Overlay};
pub use row::{format_targets, FlapRow, PadSide, RowSpec};
