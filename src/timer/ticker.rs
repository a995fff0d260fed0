//! Ticker: Dedicated thread that turns wall-clock time into tick events.
//!
//! The animation core is poll-driven and clock-agnostic; something still has
//! to wake the main loop while flaps are in flight. The ticker thread sends
//! a [`Tick`] on a bounded channel at a fixed cadence, and the main loop
//! responds by calling `Board::advance(Instant::now())`.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Tick number (monotonically increasing).
    pub seq: u64,
    /// The instant the tick was produced.
    pub at: Instant,
}

/// Real-time tick source for driving a board live.
///
/// Use the receiver with `select!` alongside input events:
///
/// ```ignore
/// loop {
///     select! {
///         recv(ticker.receiver()) -> tick => {
///             board.advance(tick.unwrap().at);
///             redraw(&board.snapshot());
///         }
///         recv(input_rx) -> event => handle_input(event),
///     }
/// }
/// ```
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    tick_rx: Receiver<Tick>,
}

impl Ticker {
    /// Spawn a ticker thread with the given cadence.
    ///
    /// The cadence should be at or below the board's step interval so no
    /// scheduler deadline waits longer than one tick.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the thread.
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();

        // Bounded at 1: a slow consumer drops ticks instead of queuing a
        // backlog of stale timestamps.
        let (tick_tx, tick_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("flapboard-ticker".to_string())
            .spawn(move || Self::run_loop(&tick_tx, &shutdown_flag, interval))
            .expect("failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        }
    }

    /// The tick receiver, for use in `select!` loops.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker thread to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the ticker and wait for its thread to exit.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &AtomicBool, interval: Duration) {
        let mut seq = 0u64;
        let mut next = Instant::now() + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next {
                // Short sleeps keep shutdown latency bounded.
                thread::sleep((next - now).min(Duration::from_millis(1)));
                continue;
            }

            let _ = tick_tx.try_send(Tick { seq, at: now });
            seq += 1;
            next += interval;
            if next < now {
                // Fell behind; resume the cadence from here instead of
                // bursting catch-up ticks.
                next = now + interval;
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_delivers_ticks() {
        let ticker = Ticker::spawn(Duration::from_millis(5));

        let first = ticker.receiver().recv_timeout(Duration::from_millis(200));
        assert!(first.is_ok());

        let second = ticker.receiver().recv_timeout(Duration::from_millis(200));
        assert!(second.is_ok());
        assert!(second.unwrap().seq > first.unwrap().seq);

        ticker.join();
    }

    #[test]
    fn test_ticker_shutdown_stops_thread() {
        let ticker = Ticker::spawn(Duration::from_millis(50));
        ticker.shutdown();
        ticker.join();
    }
}
