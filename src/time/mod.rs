//! Time ports
//!
//! The engine never reads ambient time or spawns timers itself; it goes
//! through a [`Clock`] and a [`Scheduler`] so tests can drive it by hand.

pub mod clock;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{IntervalScheduler, ManualScheduler, Scheduler, TickHandle};
