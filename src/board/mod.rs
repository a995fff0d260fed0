//! Board module: Row orchestration above the per-cell flap core.
//!
//! This module contains:
//! - [`RevealSequencer`]: the monotonic row-by-row reveal state machine
//! - [`Board`]: the live board tying rows, sequencer, and scheduler together
//! - [`BoardSnapshot`] / [`RowSnapshot`]: the read-only views handed to the
//!   render layer

mod engine;
mod sequencer;

pub use engine::{Board, BoardConfig, BoardSnapshot, FeedStatus, RowSnapshot};
pub use sequencer::{RevealSequencer, RevealState};
