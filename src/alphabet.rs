//! Alphabet: The ordered glyph sequence a flap cell cycles through.
//!
//! Order is semantically meaningful: it defines the forward-cycle distance
//! between any two glyphs. A cell never steps backward, so "one position
//! before" is the longest possible trip.
//!
//! Glyphs are stored uppercased and lookups fold case, so `"a"` and `"A"`
//! resolve to the same position. A glyph that is not in the alphabet at all
//! resolves to position 0 (by convention the blank flap in the builtin
//! presets) rather than failing.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::BoardError;

/// Glyphs for the numeric preset: blank, digits, and the separators and
/// signs that show up in formatted quantities.
const NUMERIC_GLYPHS: &str = " 0123456789.,+-";

/// Glyphs for the alphanumeric preset. Includes the direction arrows so a
/// value like `"USD 64,210 ↑"` is fully cycleable.
const ALPHANUMERIC_GLYPHS: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.,:;!?+-/$↑↓";

/// An ordered, effectively-deduplicated sequence of glyphs.
///
/// Cloning is cheap: rows share their alphabet through an [`Arc`].
///
/// # Example
///
/// ```
/// use flapboard::Alphabet;
///
/// let digits = Alphabet::numeric();
/// let zero = digits.resolve("0");
/// assert_eq!(digits.glyph(zero), "0");
/// assert_eq!(digits.next_index(digits.len() - 1), 0); // wraps forward
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    glyphs: Arc<[String]>,
}

impl Alphabet {
    /// Build an alphabet from an ordered glyph sequence.
    ///
    /// Glyphs are uppercased; duplicates (after folding) keep their first
    /// position and later occurrences are dropped, so cycle distances stay
    /// well-defined.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyAlphabet`] if no glyphs remain.
    pub fn new<I, S>(glyphs: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: Vec<String> = Vec::new();
        for glyph in glyphs {
            let folded = glyph.into().to_uppercase();
            if !seen.contains(&folded) {
                seen.push(folded);
            }
        }
        if seen.is_empty() {
            return Err(BoardError::EmptyAlphabet);
        }
        Ok(Self {
            glyphs: seen.into(),
        })
    }

    /// Build an alphabet from the grapheme clusters of a string.
    ///
    /// This is how the character presets are defined; callers can supply
    /// their own glyph string the same way.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyAlphabet`] for an empty string.
    pub fn from_chars(chars: &str) -> Result<Self, BoardError> {
        Self::new(chars.graphemes(true))
    }

    /// The numeric preset: blank, `0`-`9`, and number separators/signs.
    pub fn numeric() -> Self {
        // Preset strings are non-empty, so this cannot fail.
        Self::from_chars(NUMERIC_GLYPHS).unwrap_or_else(|_| unreachable!())
    }

    /// The alphanumeric preset: blank, `A`-`Z`, `0`-`9`, punctuation, and
    /// the `↑`/`↓` direction arrows.
    pub fn alphanumeric() -> Self {
        Self::from_chars(ALPHANUMERIC_GLYPHS).unwrap_or_else(|_| unreachable!())
    }

    /// Build a words-mode alphabet: each entry is a whole token the cell
    /// flips through, and `value` is appended if the list does not already
    /// contain it, so the current target is always resolvable.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyWordList`] if `words` is empty.
    pub fn words<S: AsRef<str>>(words: &[S], value: &str) -> Result<Self, BoardError> {
        if words.is_empty() {
            return Err(BoardError::EmptyWordList);
        }
        let mut glyphs: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
        let folded = value.to_uppercase();
        if !glyphs.iter().any(|w| w.to_uppercase() == folded) {
            glyphs.push(value.to_string());
        }
        Self::new(glyphs).map_err(|_| BoardError::EmptyWordList)
    }

    /// Number of glyphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the alphabet is empty. Always `false` for a constructed
    /// alphabet; provided for API completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Get the glyph at a position.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`. Cursor indices are always produced from
    /// this alphabet, so in-bounds access is an internal invariant.
    #[inline]
    pub fn glyph(&self, index: usize) -> &str {
        &self.glyphs[index]
    }

    /// Find the position of a glyph, folding case.
    pub fn position(&self, glyph: &str) -> Option<usize> {
        let folded = glyph.to_uppercase();
        self.glyphs.iter().position(|g| *g == folded)
    }

    /// Resolve a glyph to a position, falling back to 0 when absent.
    ///
    /// The fallback is deliberate: a target that cannot be displayed must
    /// still land somewhere, and position 0 is the blank flap in the builtin
    /// presets.
    pub fn resolve(&self, glyph: &str) -> usize {
        self.position(glyph).unwrap_or_else(|| {
            tracing::debug!(glyph, "glyph not in alphabet, resolving to 0");
            0
        })
    }

    /// The forward successor of a position, wrapping at the end.
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.glyphs.len() {
            0
        } else {
            index + 1
        }
    }

    /// Iterate over the glyphs in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.glyphs.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_preset_starts_blank() {
        let a = Alphabet::numeric();
        assert_eq!(a.glyph(0), " ");
        assert_eq!(a.resolve("0"), 1);
        assert_eq!(a.resolve("9"), 10);
    }

    #[test]
    fn test_alphanumeric_preset_has_arrows() {
        let a = Alphabet::alphanumeric();
        assert!(a.position("↑").is_some());
        assert!(a.position("↓").is_some());
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        let glyphs: Vec<String> = Vec::new();
        assert_eq!(Alphabet::new(glyphs), Err(BoardError::EmptyAlphabet));
        assert_eq!(Alphabet::from_chars(""), Err(BoardError::EmptyAlphabet));
    }

    #[test]
    fn test_case_folding() {
        let a = Alphabet::alphanumeric();
        assert_eq!(a.position("h"), a.position("H"));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let a = Alphabet::from_chars("aAbB").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.glyph(0), "A");
        assert_eq!(a.glyph(1), "B");
    }

    #[test]
    fn test_resolve_falls_back_to_zero() {
        let a = Alphabet::numeric();
        assert_eq!(a.resolve("Z"), 0);
    }

    #[test]
    fn test_next_index_wraps() {
        let a = Alphabet::from_chars("ABC").unwrap();
        assert_eq!(a.next_index(0), 1);
        assert_eq!(a.next_index(2), 0);
    }

    #[test]
    fn test_words_appends_missing_value() {
        let a = Alphabet::words(&["ON TIME", "DELAYED"], "CANCELLED").unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.position("CANCELLED"), Some(2));

        let b = Alphabet::words(&["ON TIME", "DELAYED"], "delayed").unwrap();
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_empty_word_list_rejected() {
        let words: [&str; 0] = [];
        assert_eq!(Alphabet::words(&words, "X"), Err(BoardError::EmptyWordList));
    }
}
