//! RevealSequencer: The board's row-by-row reveal state machine.
//!
//! A board does not show its real content all at once: after the upstream
//! feed becomes ready, rows are swapped from placeholder to real content one
//! at a time, top to bottom, one per stagger tick. This type is the pure
//! state machine over the reveal cursor; the timers that drive it live in
//! the board engine.
//!
//! The cursor is strictly monotonic: it only ever increases, by exactly one
//! per advance, and resets only on a full board restart.

/// Where the reveal currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Nothing revealed yet; every row shows placeholder content.
    Idle,
    /// Rows `0..=k` show real content.
    Revealing(usize),
    /// Every row shows real content.
    Complete,
}

/// Monotonic reveal cursor over a fixed number of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSequencer {
    row_count: usize,
    /// `None` is the idle cursor (the `-1` of the mechanical model).
    cursor: Option<usize>,
}

impl RevealSequencer {
    /// Create an idle sequencer for `row_count` rows.
    pub const fn new(row_count: usize) -> Self {
        Self {
            row_count,
            cursor: None,
        }
    }

    /// The number of rows this sequencer covers.
    #[inline]
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    /// Current state.
    pub fn state(&self) -> RevealState {
        match self.cursor {
            None => RevealState::Idle,
            Some(k) if k + 1 >= self.row_count => RevealState::Complete,
            Some(k) => RevealState::Revealing(k),
        }
    }

    /// Whether row `index` has been revealed.
    pub fn is_revealed(&self, index: usize) -> bool {
        self.cursor.is_some_and(|k| index <= k)
    }

    /// Whether every row has been revealed.
    pub fn is_complete(&self) -> bool {
        self.state() == RevealState::Complete
    }

    /// Reveal the next row, returning its index, or `None` once complete.
    ///
    /// Advances by exactly one; never skips, never goes back.
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.cursor.map_or(0, |k| k + 1);
        if next >= self.row_count {
            return None;
        }
        self.cursor = Some(next);
        Some(next)
    }

    /// Reset to idle. Only a full board restart calls this.
    pub fn reset(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_is_strictly_sequential() {
        let mut seq = RevealSequencer::new(5);
        assert_eq!(seq.state(), RevealState::Idle);

        for expected in 0..5 {
            assert_eq!(seq.advance(), Some(expected));
        }
        assert!(seq.is_complete());
        assert_eq!(seq.advance(), None);
        assert_eq!(seq.state(), RevealState::Complete);
    }

    #[test]
    fn test_is_revealed_tracks_cursor() {
        let mut seq = RevealSequencer::new(3);
        assert!(!seq.is_revealed(0));

        seq.advance();
        assert!(seq.is_revealed(0));
        assert!(!seq.is_revealed(1));

        seq.advance();
        assert!(seq.is_revealed(1));
        assert!(!seq.is_revealed(2));
    }

    #[test]
    fn test_intermediate_state_is_revealing() {
        let mut seq = RevealSequencer::new(3);
        seq.advance();
        assert_eq!(seq.state(), RevealState::Revealing(0));
        seq.advance();
        assert_eq!(seq.state(), RevealState::Revealing(1));
        seq.advance();
        assert_eq!(seq.state(), RevealState::Complete);
    }

    #[test]
    fn test_reset_replays_from_idle() {
        let mut seq = RevealSequencer::new(2);
        seq.advance();
        seq.advance();
        assert!(seq.is_complete());

        seq.reset();
        assert_eq!(seq.state(), RevealState::Idle);
        assert_eq!(seq.advance(), Some(0));
    }

    #[test]
    fn test_single_row_board_completes_immediately() {
        let mut seq = RevealSequencer::new(1);
        assert_eq!(seq.advance(), Some(0));
        assert!(seq.is_complete());
    }
}
