//! State management module
//!
//! The timer engine owns countdown state; `AppState` is the handle HTTP
//! handlers use to reach it through the timer loop.

pub mod app_state;
pub mod engine;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{TimerEngine, TICK_INTERVAL};
pub use timer_state::{TimerSnapshot, TimerState, TimerStatus};
