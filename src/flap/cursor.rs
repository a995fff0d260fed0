//! FlapCursor: The per-cell transition state machine.
//!
//! A cursor tracks three positions into its alphabet: `current` (the glyph
//! fully shown on the top half), `previous` (the glyph shown before the last
//! step, still visible on the bottom half mid-flip), and `target` (where the
//! cell is headed). The cell is *settled* when `current == target` and
//! *advancing* otherwise.
//!
//! Stepping is strictly forward with wraparound, modeling a mechanical flap
//! drum that cannot reverse. The cursor never computes the distance to its
//! target; it free-runs one position per step until it lands on it. When the
//! target sits just behind `current` in cycle order, the cursor takes the
//! long way around. That is the intended behavior; a shortest-path jump
//! would change the observable animation duration.
//!
//! A freshly created cursor has no current glyph yet (the blank face of a
//! brand-new cell); its first step lands on position 0.

/// Outcome of retargeting a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retarget {
    /// The new target is already the current glyph; nothing to do.
    Unchanged,
    /// The cursor now needs to advance. The caller performs the first step
    /// synchronously and schedules ticks for the rest.
    Advancing,
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Still short of the target; keep ticking.
    Advanced,
    /// This step landed on the target. The caller stops ticking and
    /// triggers the one-shot flap-down flourish.
    Settled,
}

/// Per-cell cursor into an alphabet of `len` glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlapCursor {
    len: usize,
    current: Option<usize>,
    previous: Option<usize>,
    target: usize,
}

impl FlapCursor {
    /// Create a cursor for an alphabet of `len` glyphs, showing nothing yet
    /// and targeting position 0.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `len == 0`; empty alphabets are rejected at
    /// configuration time, before any cursor exists.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "cursor requires a non-empty alphabet");
        Self {
            len,
            current: None,
            previous: None,
            target: 0,
        }
    }

    /// The position currently shown, or `None` for a cell that has never
    /// stepped.
    #[inline]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// The position shown before the last step.
    #[inline]
    pub const fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// The position the cursor is heading toward.
    #[inline]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Whether the cursor has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == Some(self.target)
    }

    /// Point the cursor at a new target.
    ///
    /// Only the target changes: `current` and `previous` stay where they
    /// are, so a retarget mid-flight continues forward from wherever the
    /// drum happens to be. Retargeting to the glyph already shown is a
    /// no-op and must not cause a full wrap.
    pub fn set_target(&mut self, target: usize) -> Retarget {
        debug_assert!(target < self.len, "target out of alphabet bounds");
        self.target = target;
        if self.is_settled() {
            Retarget::Unchanged
        } else {
            Retarget::Advancing
        }
    }

    /// Advance one position: `previous <- current`,
    /// `current <- (current + 1) mod len` (an unstepped cursor lands on 0).
    pub fn step(&mut self) -> Step {
        self.previous = self.current;
        self.current = Some(match self.current {
            Some(i) if i + 1 < self.len => i + 1,
            _ => 0,
        });
        if self.is_settled() {
            Step::Settled
        } else {
            Step::Advanced
        }
    }
}
