//! Timer module: Deterministic scheduling for the animation core.
//!
//! This module contains:
//! - [`Scheduler`]: a single-threaded timer wheel the board polls with an
//!   explicit `now`, making every animation test run on a simulated clock
//! - [`TaskHandle`]: cancellation handle for a scheduled task
//! - [`Ticker`]: a real-time tick thread for driving the scheduler live
//!
//! The core never reads the wall clock itself. Callers pass `Instant`s in,
//! so a test can step time forward in exact increments and observe exactly
//! which tasks fire, in which order.

mod scheduler;
mod ticker;

pub use scheduler::{Scheduler, TaskHandle};
pub use ticker::{Tick, Ticker};
