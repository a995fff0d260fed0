//! Digit rendering model: from cursor state to flap sub-elements.
//!
//! A split-flap digit is drawn as four conceptual pieces: a static top half,
//! a static bottom half, a flipping overlay, and an interactive bottom
//! half-preview. [`compose`] maps a read-only [`CellSnapshot`] to those
//! pieces. It is a pure function: no timing lives here, the advancing and
//! settling signals arrive precomputed in the snapshot.
//!
//! [`HoverPreview`] is the one interactive piece: hovering a digit raises
//! its bottom half partway; leaving lets it fall back after a fixed release
//! duration. It runs entirely beside the value machine and never touches it.

use std::time::{Duration, Instant};

/// Read-only view of one cell, produced once per board advance.
///
/// This is the only data the render layer may consume; it never reaches
/// into cursors or timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSnapshot {
    /// Glyph currently shown on the top half (empty for a cell that has
    /// never stepped).
    pub current: String,
    /// Glyph shown before the last step (bottom half mid-flip).
    pub previous: String,
    /// True while the cell has not yet reached its target.
    pub is_advancing: bool,
    /// True exactly on the advance pass in which the cell settled; selects
    /// the one-shot flap-down flourish.
    pub is_settling: bool,
    /// True while the hover preview holds the bottom half raised.
    pub preview_raised: bool,
}

/// The flipping element layered over the static halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Mid-flip: the previous glyph frozen partway through its rotation,
    /// shown on every advancing tick except the last.
    MidFlip(String),
    /// The settling flourish: the previous glyph completing its fall.
    FlapDown(String),
}

/// The four visual sub-elements of one digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitVisual {
    /// Static top half: the incoming glyph.
    pub top: String,
    /// Static bottom half: the glyph from the prior position, still visible
    /// until the falling flap covers it.
    pub bottom: String,
    /// Flipping overlay, present only while a transition is visible.
    pub overlay: Option<Overlay>,
    /// Raised bottom half-preview showing the current glyph, present only
    /// while the hover preview is active on a settled cell.
    pub preview: Option<String>,
}

/// Map a cell snapshot to its visual sub-elements.
pub fn compose(snapshot: &CellSnapshot) -> DigitVisual {
    let overlay = if snapshot.is_settling {
        Some(Overlay::FlapDown(snapshot.previous.clone()))
    } else if snapshot.is_advancing {
        Some(Overlay::MidFlip(snapshot.previous.clone()))
    } else {
        None
    };

    // The preview only shows on a resting digit; an advancing drum would
    // tear it away anyway.
    let preview = (snapshot.preview_raised && !snapshot.is_advancing)
        .then(|| snapshot.current.clone());

    DigitVisual {
        top: snapshot.current.clone(),
        bottom: snapshot.previous.clone(),
        overlay,
        preview,
    }
}

/// Hover sub-state of one digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreviewState {
    /// Bottom half at rest.
    Idle,
    /// Pointer over the digit; bottom half held partway up.
    Held,
    /// Pointer left; the partial rotation finishes, then the half falls
    /// back once the release duration elapses.
    Releasing {
        /// When the pointer left.
        since: Instant,
    },
}

/// Interactive half-flap preview for one digit.
///
/// Keyed only on the hover boolean and elapsed-time-since-hover-out;
/// independent of the value transition machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverPreview {
    release: Duration,
    state: PreviewState,
}

impl HoverPreview {
    /// Create a preview with the given release duration.
    pub const fn new(release: Duration) -> Self {
        Self {
            release,
            state: PreviewState::Idle,
        }
    }

    /// Pointer entered the digit.
    pub fn hover_in(&mut self) {
        self.state = PreviewState::Held;
    }

    /// Pointer left the digit at `now`.
    pub fn hover_out(&mut self, now: Instant) {
        if self.state == PreviewState::Held {
            self.state = PreviewState::Releasing { since: now };
        }
    }

    /// Let a pending release finish. Called on every board advance.
    pub fn poll(&mut self, now: Instant) {
        if let PreviewState::Releasing { since } = self.state {
            if now.duration_since(since) >= self.release {
                self.state = PreviewState::Idle;
            }
        }
    }

    /// Whether the bottom half is currently raised.
    pub fn is_raised(&self) -> bool {
        self.state != PreviewState::Idle
    }
}
