//! Scheduler: A poll-driven timer wheel with cancellation handles.
//!
//! Timers here are data, not callbacks: each scheduled task carries a caller
//! token (for the board, a `TimerTask` value naming the cell or sequencer
//! action), and [`Scheduler::fire_due`] hands back the tokens whose deadline
//! has passed. The owner dispatches them while holding `&mut` to its own
//! state, which keeps the whole engine single-threaded and borrow-friendly.
//!
//! Cancellation is the correctness mechanism of the engine: a pending tick
//! for a cell is cancelled *before* the cell is retargeted or torn down, so
//! no stale timer ever acts on replaced state.

use std::time::{Duration, Instant};

/// Handle to a scheduled task, used to cancel it.
///
/// Handles are never reused: every call to `schedule_*` returns a fresh one,
/// so cancelling a handle that already fired (or was already cancelled) is a
/// harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// One scheduled entry.
#[derive(Debug)]
struct Entry<T> {
    id: u64,
    due: Instant,
    /// `Some` for repeating tasks, `None` for one-shots.
    every: Option<Duration>,
    token: T,
}

/// A single-threaded timer wheel.
///
/// All deadlines are computed from the `now` passed by the caller; the
/// scheduler itself never looks at the wall clock.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use flapboard::Scheduler;
///
/// let mut sched = Scheduler::new();
/// let t0 = Instant::now();
/// let handle = sched.schedule_once(t0, Duration::from_millis(10), "hello");
///
/// assert!(sched.fire_due(t0).is_empty());
/// assert_eq!(
///     sched.fire_due(t0 + Duration::from_millis(10)),
///     vec![(handle, "hello")],
/// );
/// ```
#[derive(Debug)]
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `token` to fire once, `delay` after `now`.
    pub fn schedule_once(&mut self, now: Instant, delay: Duration, token: T) -> TaskHandle {
        self.insert(now + delay, None, token)
    }

    /// Schedule `token` to fire every `interval`, first at `now + interval`.
    pub fn schedule_repeating(
        &mut self,
        now: Instant,
        interval: Duration,
        token: T,
    ) -> TaskHandle {
        self.insert(now + interval, Some(interval), token)
    }

    /// Cancel a task. Returns `true` if it was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != handle.0);
        self.entries.len() != before
    }

    /// Whether a task is still pending.
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.id == handle.0)
    }

    /// The earliest pending deadline, if any. Real-time drivers sleep
    /// until this instant.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, due: Instant, every: Option<Duration>, token: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            every,
            token,
        });
        TaskHandle(id)
    }
}

impl<T: Clone> Scheduler<T> {
    /// Collect every task due at `now`, in deadline order (ties broken by
    /// scheduling order). Each token is paired with the handle of the timer
    /// that produced it, so a dispatcher can drop tokens whose timer was
    /// cancelled or replaced by an earlier token in the same batch.
    ///
    /// One-shot tasks are removed. Repeating tasks are re-armed one interval
    /// ahead; if the caller fell behind by more than an interval, the next
    /// deadline is clamped to `now + interval` rather than firing a burst of
    /// catch-up ticks (same policy as the live [`Ticker`](super::Ticker)).
    pub fn fire_due(&mut self, now: Instant) -> Vec<(TaskHandle, T)> {
        let mut due: Vec<(Instant, u64)> = self
            .entries
            .iter()
            .filter(|e| e.due <= now)
            .map(|e| (e.due, e.id))
            .collect();
        due.sort_unstable();

        let mut fired = Vec::with_capacity(due.len());
        for (_, id) in due {
            // The entry may have been removed by an earlier iteration only if
            // ids collided, which insert() rules out.
            let idx = match self.entries.iter().position(|e| e.id == id) {
                Some(idx) => idx,
                None => continue,
            };
            if let Some(interval) = self.entries[idx].every {
                let entry = &mut self.entries[idx];
                entry.due += interval;
                if entry.due <= now {
                    entry.due = now + interval;
                }
                fired.push((TaskHandle(id), entry.token.clone()));
            } else {
                fired.push((TaskHandle(id), self.entries.swap_remove(idx).token));
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_once_fires_once() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        let h = sched.schedule_once(t0, ms(5), 1u32);

        assert!(sched.fire_due(t0 + ms(4)).is_empty());
        assert_eq!(sched.fire_due(t0 + ms(5)), vec![(h, 1)]);
        assert!(sched.fire_due(t0 + ms(100)).is_empty());
        assert!(sched.is_empty());
    }

    #[test]
    fn test_repeating_rearms() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        let h = sched.schedule_repeating(t0, ms(10), "tick");

        assert_eq!(sched.fire_due(t0 + ms(10)), vec![(h, "tick")]);
        assert_eq!(sched.fire_due(t0 + ms(20)), vec![(h, "tick")]);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_repeating_clamps_when_behind() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_repeating(t0, ms(10), ());

        // Five intervals elapsed, but only one tick fires.
        assert_eq!(sched.fire_due(t0 + ms(50)).len(), 1);
        assert_eq!(sched.next_deadline(), Some(t0 + ms(60)));
    }

    #[test]
    fn test_cancel_pending() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        let h = sched.schedule_once(t0, ms(5), ());
        assert!(sched.is_scheduled(h));
        assert!(sched.cancel(h));
        assert!(!sched.is_scheduled(h));
        assert!(sched.fire_due(t0 + ms(10)).is_empty());
    }

    #[test]
    fn test_cancel_fired_is_noop() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        let h = sched.schedule_once(t0, ms(5), ());
        sched.fire_due(t0 + ms(5));
        assert!(!sched.cancel(h));
    }

    #[test]
    fn test_fire_order_is_deadline_order() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        let late = sched.schedule_once(t0, ms(20), "late");
        let early = sched.schedule_once(t0, ms(10), "early");

        assert_eq!(
            sched.fire_due(t0 + ms(30)),
            vec![(early, "early"), (late, "late")]
        );
    }

    #[test]
    fn test_next_deadline() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        assert_eq!(sched.next_deadline(), None);
        sched.schedule_once(t0, ms(30), ());
        sched.schedule_once(t0, ms(10), ());
        assert_eq!(sched.next_deadline(), Some(t0 + ms(10)));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_repeating(t0, ms(10), ());
        sched.schedule_once(t0, ms(10), ());
        sched.clear();
        assert!(sched.is_empty());
        assert!(sched.fire_due(t0 + ms(100)).is_empty());
    }
}
