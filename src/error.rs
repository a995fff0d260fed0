//! Error taxonomy for board and row configuration.
//!
//! Only configuration problems are surfaced as errors. Runtime lookups that
//! miss (a target glyph absent from its alphabet) resolve to index 0 instead:
//! a physical board always shows *something*.

use thiserror::Error;

/// Errors raised while configuring a board, row, or alphabet.
///
/// These are caller contract violations and are rejected at setup time;
/// the engine never substitutes a silent default for them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// An alphabet was constructed with no glyphs.
    ///
    /// A cell cannot cycle through an empty sequence, and resolution
    /// fallback (index 0) would have nothing to fall back to.
    #[error("alphabet must contain at least one glyph")]
    EmptyAlphabet,

    /// A board was constructed with no rows.
    #[error("board must contain at least one row")]
    EmptyBoard,

    /// A words-mode row was given an empty word list.
    #[error("words mode requires at least one word")]
    EmptyWordList,

    /// An upstream update supplied the wrong number of row specs; the
    /// board's row count is fixed at construction.
    #[error("expected {expected} row specs, got {got}")]
    RowCountMismatch {
        /// The board's row count.
        expected: usize,
        /// The number of specs supplied.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BoardError::EmptyAlphabet.to_string(),
            "alphabet must contain at least one glyph"
        );
        assert_eq!(
            BoardError::EmptyBoard.to_string(),
            "board must contain at least one row"
        );
    }
}
