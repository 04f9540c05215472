//! Background tasks module
//!
//! The timer loop is the only place timer state is mutated.

pub mod timer_loop;

// Re-export main types
pub use timer_loop::{timer_loop_task, Command, FrameSnapshot, TimerAction, TimerLoop};
