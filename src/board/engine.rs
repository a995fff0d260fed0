//! Board: N rows, a reveal sequencer, and the scheduler that drives both.
//!
//! The board owns all mutable animation state. External collaborators feed
//! it three things: per-row [`RowSpec`]s whenever upstream data changes,
//! feed status transitions (`feed_ready` / `feed_error`), and time
//! (`advance(now)`). Everything else (cell ticks, the initial reveal delay,
//! the stagger between rows) flows through the internal [`Scheduler`], so
//! the whole board is deterministic under a simulated clock.
//!
//! Output is only ever a [`BoardSnapshot`]: the render layer never reaches
//! into cursors or timers.

use std::time::{Duration, Instant};

use crate::alphabet::Alphabet;
use crate::board::sequencer::{RevealSequencer, RevealState};
use crate::error::BoardError;
use crate::flap::{CellSnapshot, FlapRow, RowSpec};
use crate::render::Rgb;
use crate::timer::{Scheduler, TaskHandle};

/// Timing and display knobs for a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Interval between flap steps of an advancing cell.
    pub timing: Duration,
    /// Whether hinge lines are drawn at all (rows can also opt out
    /// individually).
    pub hinge: bool,
    /// Delay between successive row reveals.
    pub stagger_delay: Duration,
    /// One-time delay between the feed becoming ready and the first reveal.
    pub initial_reveal_delay: Duration,
    /// How long a hover preview takes to fall back after the pointer leaves.
    pub hover_release: Duration,
    /// Value shown by rows that would have displayed upstream data when the
    /// feed reports an error.
    pub error_token: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            timing: Duration::from_millis(40),
            hinge: true,
            stagger_delay: Duration::from_millis(300),
            initial_reveal_delay: Duration::from_millis(1000),
            hover_release: Duration::from_millis(300),
            error_token: "ERROR".to_string(),
        }
    }
}

/// State of the upstream data feed, as reported by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// No data yet; rows show placeholder content.
    Loading,
    /// Data available; reveal may run.
    Ready,
    /// The feed reported an error.
    Failed,
}

/// Tokens dispatched by the board's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TimerTask {
    /// Advance one cell by one flap.
    CellStep { row: usize, col: usize },
    /// The one-time delay before the first reveal elapsed.
    RevealDelay,
    /// Reveal the next row.
    RevealStep,
}

/// Read-only view of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSnapshot {
    /// Per-cell snapshots, left to right.
    pub cells: Vec<CellSnapshot>,
    /// Whether this row shows real (revealed) content rather than
    /// placeholder content.
    pub revealed: bool,
    /// Whether this row draws its hinge line.
    pub hinge: bool,
    /// Accent color, if the row carries one.
    pub accent: Option<Rgb>,
}

impl RowSnapshot {
    /// The row's current glyphs joined into a string. Handy for tests and
    /// text-only consumers.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.current.as_str()).collect()
    }
}

/// Read-only view of the whole board, produced once per advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Row snapshots, top to bottom.
    pub rows: Vec<RowSnapshot>,
}

/// A split-flap board.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use flapboard::{Board, BoardConfig, RowSpec};
///
/// let placeholder = vec![
///     RowSpec::new("").with_length(12),
///     RowSpec::new(" LOADING...").with_length(12),
/// ];
/// let now = Instant::now();
/// let mut board = Board::new(placeholder, BoardConfig::default(), now).unwrap();
///
/// board.update(
///     vec![
///         RowSpec::new(" BTC PRICE").with_length(12),
///         RowSpec::new("64,210").with_length(12),
///     ],
///     now,
/// ).unwrap();
/// board.feed_ready(now);
/// // ...then advance(now) from a ticker and draw snapshot()s.
/// ```
pub struct Board {
    config: BoardConfig,
    default_alphabet: Alphabet,
    /// Live rows; each shows either its placeholder or its real spec,
    /// depending on the reveal cursor.
    rows: Vec<FlapRow>,
    placeholder: Vec<RowSpec>,
    /// Latest upstream specs, applied to each row as it is revealed.
    real: Vec<RowSpec>,
    sequencer: RevealSequencer,
    status: FeedStatus,
    sched: Scheduler<TimerTask>,
    reveal_delay: Option<TaskHandle>,
    reveal_timer: Option<TaskHandle>,
}

impl Board {
    /// Create a board showing `placeholder` rows, not yet revealed.
    ///
    /// The placeholder specs fix the board's row count for its lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyBoard`] for an empty placeholder set, or
    /// the first configuration error found in a row spec.
    pub fn new(
        placeholder: Vec<RowSpec>,
        config: BoardConfig,
        now: Instant,
    ) -> Result<Self, BoardError> {
        if placeholder.is_empty() {
            return Err(BoardError::EmptyBoard);
        }
        for spec in &placeholder {
            spec.validate()?;
        }

        let default_alphabet = Alphabet::alphanumeric();
        let mut board = Self {
            sequencer: RevealSequencer::new(placeholder.len()),
            real: placeholder.clone(),
            rows: Vec::with_capacity(placeholder.len()),
            placeholder,
            default_alphabet,
            status: FeedStatus::Loading,
            sched: Scheduler::new(),
            reveal_delay: None,
            reveal_timer: None,
            config,
        };
        board.build_rows(now)?;
        Ok(board)
    }

    /// (Re)build live rows from the placeholder set and start them
    /// animating toward their placeholder values.
    fn build_rows(&mut self, now: Instant) -> Result<(), BoardError> {
        self.rows.clear();
        for (index, spec) in self.placeholder.iter().enumerate() {
            let mut row = FlapRow::new(
                spec.clone(),
                &self.default_alphabet,
                self.config.timing,
                self.config.hover_release,
            )?;
            row.apply(
                spec.clone(),
                &self.default_alphabet,
                now,
                &mut self.sched,
                |col| TimerTask::CellStep { row: index, col },
            )?;
            self.rows.push(row);
        }
        Ok(())
    }

    /// The board's configuration.
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Current reveal state.
    pub fn reveal_state(&self) -> RevealState {
        self.sequencer.state()
    }

    /// Current feed status.
    pub const fn feed_status(&self) -> FeedStatus {
        self.status
    }

    /// Whether every cell on the board has reached its target.
    pub fn is_settled(&self) -> bool {
        self.rows.iter().all(FlapRow::is_settled)
    }

    /// The next instant at which `advance` has work to do, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sched.next_deadline()
    }

    /// Replace the upstream row specs.
    ///
    /// Specs are diffed per row: already-revealed rows pick up their new
    /// spec immediately (and only cells whose target glyph changed
    /// re-animate); unrevealed rows keep showing placeholder content and
    /// pick up the latest spec when their reveal arrives.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::RowCountMismatch`] if `specs` does not match
    /// the board's row count, or the first configuration error found in a
    /// spec. The board is unchanged on error.
    pub fn update(&mut self, specs: Vec<RowSpec>, now: Instant) -> Result<(), BoardError> {
        if specs.len() != self.rows.len() {
            return Err(BoardError::RowCountMismatch {
                expected: self.rows.len(),
                got: specs.len(),
            });
        }
        for spec in &specs {
            spec.validate()?;
        }

        for (index, spec) in specs.iter().enumerate() {
            if self.sequencer.is_revealed(index) && *spec != self.real[index] {
                self.apply_to_row(index, spec.clone(), now);
            }
        }
        self.real = specs;
        Ok(())
    }

    /// The upstream feed has data. Schedules the first reveal after the
    /// configured initial delay.
    ///
    /// Called after a failure, this re-initializes the board (placeholder
    /// rows, idle cursor) and replays the reveal from the top.
    pub fn feed_ready(&mut self, now: Instant) {
        match self.status {
            FeedStatus::Ready => {}
            FeedStatus::Loading => self.begin_reveal(now),
            FeedStatus::Failed => {
                self.restart(now);
                self.begin_reveal(now);
            }
        }
    }

    fn begin_reveal(&mut self, now: Instant) {
        self.status = FeedStatus::Ready;
        self.reveal_delay = Some(self.sched.schedule_once(
            now,
            self.config.initial_reveal_delay,
            TimerTask::RevealDelay,
        ));
    }

    /// The upstream feed reported an error.
    ///
    /// Fail-forward: rows already revealed keep their last real content.
    /// Unrevealed rows that would have shown data show the error token
    /// instead when their reveal arrives; blank spacer rows stay blank. A
    /// reveal that has not started yet is held back until the feed
    /// recovers.
    pub fn feed_error(&mut self) {
        tracing::debug!(state = ?self.sequencer.state(), "feed error");
        self.status = FeedStatus::Failed;

        if self.sequencer.state() == RevealState::Idle {
            // Not started: stay on placeholders until the feed recovers.
            if let Some(handle) = self.reveal_delay.take() {
                self.sched.cancel(handle);
            }
            if let Some(handle) = self.reveal_timer.take() {
                self.sched.cancel(handle);
            }
            return;
        }

        for (index, spec) in self.real.iter_mut().enumerate() {
            if !self.sequencer.is_revealed(index) && !spec.value.trim().is_empty() {
                spec.value = self.config.error_token.clone();
            }
        }
    }

    /// Tear the board back down to idle placeholders. The reveal sequence
    /// replays on the next `feed_ready`.
    pub fn restart(&mut self, now: Instant) {
        tracing::debug!("board restart");
        for row in &mut self.rows {
            row.cancel_timers(&mut self.sched);
        }
        self.sched.clear();
        self.reveal_delay = None;
        self.reveal_timer = None;
        self.sequencer.reset();
        self.status = FeedStatus::Loading;
        self.real = self.placeholder.clone();
        // Placeholder specs were validated at construction.
        if let Err(err) = self.build_rows(now) {
            tracing::warn!(%err, "placeholder rebuild failed");
        }
    }

    /// Run everything due at `now`: cell ticks, the initial reveal delay,
    /// and stagger steps.
    pub fn advance(&mut self, now: Instant) {
        for row in &mut self.rows {
            row.begin_advance(now);
        }
        for (handle, task) in self.sched.fire_due(now) {
            match task {
                TimerTask::CellStep { row, col } => {
                    if let Some(row) = self.rows.get_mut(row) {
                        row.tick_cell(col, handle, &mut self.sched);
                    }
                }
                TimerTask::RevealDelay => {
                    self.reveal_delay = None;
                    tracing::debug!("reveal starting");
                    self.reveal_timer = Some(self.sched.schedule_repeating(
                        now,
                        self.config.stagger_delay,
                        TimerTask::RevealStep,
                    ));
                }
                TimerTask::RevealStep => self.reveal_step(now),
            }
        }
    }

    fn reveal_step(&mut self, now: Instant) {
        if let Some(index) = self.sequencer.advance() {
            tracing::debug!(row = index, "reveal row");
            self.apply_to_row(index, self.real[index].clone(), now);
        }
        if self.sequencer.is_complete() {
            if let Some(handle) = self.reveal_timer.take() {
                self.sched.cancel(handle);
            }
        }
    }

    fn apply_to_row(&mut self, index: usize, spec: RowSpec, now: Instant) {
        let row = &mut self.rows[index];
        // Specs are validated before they reach this point.
        if let Err(err) =
            row.apply(spec, &self.default_alphabet, now, &mut self.sched, |col| {
                TimerTask::CellStep { row: index, col }
            })
        {
            tracing::warn!(row = index, %err, "row spec rejected");
        }
    }

    /// Pointer entered a cell.
    pub fn hover_in(&mut self, row: usize, col: usize) {
        if let Some(row) = self.rows.get_mut(row) {
            row.hover_in(col);
        }
    }

    /// Pointer left a cell at `now`.
    pub fn hover_out(&mut self, row: usize, col: usize, now: Instant) {
        if let Some(row) = self.rows.get_mut(row) {
            row.hover_out(col, now);
        }
    }

    /// Produce the read-only snapshot the render layer consumes.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            rows: self
                .rows
                .iter()
                .enumerate()
                .map(|(index, row)| RowSnapshot {
                    cells: row.snapshot_cells(),
                    revealed: self.sequencer.is_revealed(index),
                    hinge: self.config.hinge && row.spec().hinge,
                    accent: row.spec().accent,
                })
                .collect(),
        }
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("rows", &self.rows.len())
            .field("status", &self.status)
            .field("reveal", &self.sequencer.state())
            .finish_non_exhaustive()
    }
}
