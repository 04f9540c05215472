//! Timer state structure and duration handling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 180;
pub const DEFAULT_MINUTES: u32 = 25;

/// Lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Expired,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Expired => "expired",
        }
    }
}

/// Countdown state owned by the timer engine
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub status: TimerStatus,
    /// Seconds left, always within `[0, duration]`
    pub remaining: f64,
    /// Instant the countdown hits zero; only set while running
    pub deadline: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create an idle state with the full duration remaining
    pub fn idle(duration_seconds: u32) -> Self {
        Self {
            status: TimerStatus::Idle,
            remaining: f64::from(duration_seconds),
            deadline: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}

/// Serializable view of the timer handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub remaining_seconds: f64,
    pub duration_seconds: u32,
    pub running: bool,
    /// `MM:SS` clock readout
    pub readout: String,
}

/// Clamp a raw minute count to the supported range.
///
/// Non-numeric input (NaN) falls back to the default; everything else is
/// rounded and pinned to `[1, 180]`.
pub fn clamp_minutes(raw: f64) -> u32 {
    if raw.is_nan() {
        return DEFAULT_MINUTES;
    }
    raw.round().clamp(f64::from(MIN_MINUTES), f64::from(MAX_MINUTES)) as u32
}

/// Parse user-entered minutes, yielding NaN for anything non-numeric
pub fn parse_minutes(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Format seconds as `MM:SS`, rounding up to the next whole second
pub fn format_readout(remaining: f64) -> String {
    let seconds = remaining.max(0.0).ceil() as u64;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
