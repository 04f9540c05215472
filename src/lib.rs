//! Sandglass - an hourglass countdown timer
//!
//! A drift-free countdown engine drives a procedural hourglass renderer: the
//! top chamber's dot matrix drains while the bottom one fills. The binary
//! hosts one timer behind a small HTTP control surface and serves each frame
//! as SVG or as a JSON display list.

pub mod config;
pub mod state;
pub mod render;
pub mod api;
pub mod tasks;
pub mod time;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerEngine, TimerStatus};
pub use render::HourglassRenderer;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
