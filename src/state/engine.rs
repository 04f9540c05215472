//! Countdown state machine

use std::time::Duration;

use chrono::TimeDelta;
use tracing::{debug, info};

use super::timer_state::{clamp_minutes, format_readout, TimerSnapshot, TimerState, TimerStatus, DEFAULT_MINUTES};
use crate::time::{Clock, Scheduler, TickHandle};

/// Default period between ticks
pub const TICK_INTERVAL: Duration = Duration::from_millis(90);

/// Owns the countdown and the periodic tick that drives it.
///
/// Remaining time is always recomputed from an absolute deadline, so late or
/// skipped ticks never accumulate drift.
#[derive(Debug)]
pub struct TimerEngine<C, S> {
    clock: C,
    scheduler: S,
    period: Duration,
    duration_seconds: u32,
    state: TimerState,
    tick_handle: Option<TickHandle>,
}

impl<C: Clock, S: Scheduler> TimerEngine<C, S> {
    /// Create an idle engine configured for the default 25 minutes
    pub fn new(clock: C, scheduler: S) -> Self {
        let duration_seconds = DEFAULT_MINUTES * 60;
        Self {
            clock,
            scheduler,
            period: TICK_INTERVAL,
            duration_seconds,
            state: TimerState::idle(duration_seconds),
            tick_handle: None,
        }
    }

    /// Use a different tick period for subsequent starts
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Set a new duration from a raw minute value and return to idle
    pub fn configure(&mut self, minutes: f64) {
        self.stop_ticking();
        let minutes = clamp_minutes(minutes);
        self.duration_seconds = minutes * 60;
        self.state = TimerState::idle(self.duration_seconds);
        info!("Timer configured for {} minutes", minutes);
    }

    /// Begin or resume the countdown. Returns false when nothing changed.
    pub fn start(&mut self) -> bool {
        if self.state.is_running() || self.state.remaining <= 0.0 {
            return false;
        }

        self.stop_ticking();
        let now = self.clock.now();
        let remaining_ms = (self.state.remaining * 1000.0).round() as i64;
        self.state.deadline = Some(now + TimeDelta::milliseconds(remaining_ms));
        self.state.status = TimerStatus::Running;
        self.tick_handle = Some(self.scheduler.start_periodic(self.period));

        info!("Timer started with {:.1}s remaining", self.state.remaining);
        true
    }

    /// Recompute remaining time from the deadline and expire at zero
    pub fn tick(&mut self) -> f64 {
        let deadline = match (self.state.status, self.state.deadline) {
            (TimerStatus::Running, Some(deadline)) => deadline,
            _ => return self.state.remaining,
        };

        let left_ms = (deadline - self.clock.now()).num_milliseconds();
        self.state.remaining = (left_ms.max(0) as f64 / 1000.0).min(f64::from(self.duration_seconds));
        debug!("Tick: {:.3}s remaining", self.state.remaining);

        if self.state.remaining <= 0.0 {
            self.stop_ticking();
            self.state.status = TimerStatus::Expired;
            info!("Timer expired");
        }
        self.state.remaining
    }

    /// Freeze the countdown. Returns false when the timer was not running.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        // Snapshot first so the paused value is not one tick stale
        self.tick();
        if self.state.is_running() {
            self.stop_ticking();
            self.state.status = TimerStatus::Paused;
            info!("Timer paused with {:.1}s remaining", self.state.remaining);
        }
        true
    }

    /// Stop the countdown and refill to the configured duration
    pub fn reset(&mut self) {
        self.stop_ticking();
        self.state = TimerState::idle(self.duration_seconds);
        info!("Timer reset to {}s", self.duration_seconds);
    }

    /// Remaining seconds, ticking first when running
    pub fn remaining(&mut self) -> f64 {
        if self.state.is_running() {
            self.tick();
        }
        self.state.remaining
    }

    /// Last computed remaining seconds without consulting the clock
    pub fn peek_remaining(&self) -> f64 {
        self.state.remaining
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.state.status,
            remaining_seconds: self.state.remaining,
            duration_seconds: self.duration_seconds,
            running: self.state.is_running(),
            readout: format_readout(self.state.remaining),
        }
    }

    fn stop_ticking(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.scheduler.cancel(handle);
        }
        self.state.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{ManualClock, ManualScheduler};
    use proptest::prelude::*;

    fn engine() -> (ManualClock, TimerEngine<ManualClock, ManualScheduler>) {
        let clock = ManualClock::at_epoch();
        let engine = TimerEngine::new(clock.clone(), ManualScheduler::new());
        (clock, engine)
    }

    #[test]
    fn configure_clamps_duration() {
        let (_, mut engine) = engine();

        engine.configure(0.0);
        assert_eq!(engine.duration_seconds(), 60);

        engine.configure(999.0);
        assert_eq!(engine.duration_seconds(), 10_800);

        engine.configure(f64::NAN);
        assert_eq!(engine.duration_seconds(), 1_500);
        assert_eq!(engine.peek_remaining(), 1_500.0);
        assert_eq!(engine.status(), TimerStatus::Idle);
    }

    #[test]
    fn configure_cancels_a_running_countdown() {
        let (clock, mut engine) = engine();
        engine.start();
        clock.advance_millis(5_000);

        engine.configure(3.0);
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.peek_remaining(), 180.0);
        assert!(!engine.scheduler().is_active());
        assert!(engine.state().deadline.is_none());
    }

    #[test]
    fn start_is_a_no_op_when_running() {
        let (_, mut engine) = engine();
        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(engine.scheduler().active_count(), 1);
        assert_eq!(engine.scheduler().started(), 1);
        assert_eq!(engine.scheduler().period(), Some(TICK_INTERVAL));
    }

    #[test]
    fn tick_outside_running_changes_nothing() {
        let (clock, mut engine) = engine();
        clock.advance_millis(60_000);
        assert_eq!(engine.tick(), 1_500.0);
        assert_eq!(engine.status(), TimerStatus::Idle);
    }

    #[test]
    fn expires_after_full_duration() {
        let (clock, mut engine) = engine();
        engine.configure(1.0);
        engine.start();

        clock.advance_millis(60_500);
        assert_eq!(engine.tick(), 0.0);
        assert_eq!(engine.status(), TimerStatus::Expired);
        assert!(!engine.scheduler().is_active());

        // Expired is terminal until reset
        assert!(!engine.start());
        assert_eq!(engine.status(), TimerStatus::Expired);
    }

    #[test]
    fn pause_then_reset_restores_duration() {
        let (clock, mut engine) = engine();
        engine.configure(25.0);
        engine.start();

        clock.advance_millis(10_000);
        assert!(engine.pause());
        assert_eq!(engine.status(), TimerStatus::Paused);
        assert_eq!(engine.peek_remaining(), 1_490.0);
        assert!(!engine.scheduler().is_active());

        engine.reset();
        assert_eq!(engine.peek_remaining(), 1_500.0);
        assert_eq!(engine.status(), TimerStatus::Idle);
    }

    #[test]
    fn pause_twice_is_idempotent() {
        let (clock, mut engine) = engine();
        engine.start();
        clock.advance_millis(2_000);
        assert!(engine.pause());
        let after_first = engine.snapshot();

        clock.advance_millis(7_000);
        assert!(!engine.pause());
        assert_eq!(engine.snapshot(), after_first);
    }

    #[test]
    fn paused_time_does_not_count() {
        let (clock, mut engine) = engine();
        engine.configure(1.0);
        engine.start();
        clock.advance_millis(20_000);
        engine.pause();

        clock.advance_millis(600_000);
        assert_eq!(engine.remaining(), 40.0);

        engine.start();
        clock.advance_millis(15_000);
        assert_eq!(engine.remaining(), 25.0);
    }

    #[test]
    fn pause_at_deadline_expires_instead() {
        let (clock, mut engine) = engine();
        engine.configure(1.0);
        engine.start();
        clock.advance_millis(61_000);

        assert!(engine.pause());
        assert_eq!(engine.status(), TimerStatus::Expired);
        assert_eq!(engine.peek_remaining(), 0.0);
    }

    #[test]
    fn only_one_tick_stream_is_ever_live() {
        let (clock, mut engine) = engine();
        for _ in 0..5 {
            engine.start();
            clock.advance_millis(1_000);
            engine.pause();
            engine.start();
            assert_eq!(engine.scheduler().active_count(), 1);
            engine.pause();
        }
        assert_eq!(engine.scheduler().active_count(), 0);
    }

    #[test]
    fn remaining_pulls_fresh_value_while_running() {
        let (clock, mut engine) = engine();
        engine.start();
        clock.advance_millis(3_250);
        assert_eq!(engine.peek_remaining(), 1_500.0);
        assert_eq!(engine.remaining(), 1_496.75);
    }

    #[test]
    fn snapshot_reports_readout() {
        let (clock, mut engine) = engine();
        engine.start();
        clock.advance_millis(500);
        engine.tick();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, TimerStatus::Running);
        assert!(snapshot.running);
        assert_eq!(snapshot.readout, "25:00");
        assert_eq!(snapshot.duration_seconds, 1_500);
    }

    proptest! {
        #[test]
        fn delayed_ticks_do_not_drift(delays in proptest::collection::vec(0i64..5_000, 1..40)) {
            let (clock, mut engine) = engine();
            engine.configure(1.0);
            engine.start();

            let mut previous = engine.peek_remaining();
            let mut elapsed = 0i64;
            for delay in delays {
                clock.advance_millis(delay);
                elapsed += delay;
                let remaining = engine.tick();

                let expected = ((60_000 - elapsed).max(0) as f64) / 1000.0;
                prop_assert_eq!(remaining, expected);
                prop_assert!(remaining <= previous);
                if remaining > 0.0 {
                    prop_assert_eq!(engine.status(), TimerStatus::Running);
                } else {
                    prop_assert_eq!(engine.status(), TimerStatus::Expired);
                }
                previous = remaining;
            }
        }
    }
}
