//! Timer loop background task

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::{
    render::{DisplayList, FrameInput, FrameSummary, HourglassRenderer},
    state::{timer_state::TimerSnapshot, TimerEngine, TimerStatus},
    time::{Clock, IntervalScheduler},
};

/// Something a caller wants the timer to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerAction {
    /// Set the duration from raw minutes
    Configure(f64),
    Start,
    Pause,
    Reset,
    /// Re-render with a fresh remaining value
    Refresh,
}

impl TimerAction {
    pub fn name(&self) -> &'static str {
        match self {
            TimerAction::Configure(_) => "set",
            TimerAction::Start => "start",
            TimerAction::Pause => "pause",
            TimerAction::Reset => "reset",
            TimerAction::Refresh => "refresh",
        }
    }

    /// Whether the action can change timer state
    pub fn is_control(&self) -> bool {
        !matches!(self, TimerAction::Refresh)
    }
}

/// Action plus the channel its resulting frame goes back on
#[derive(Debug)]
pub struct Command {
    pub action: TimerAction,
    pub reply: oneshot::Sender<FrameSnapshot>,
}

/// Everything known about one rendered frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub timer: TimerSnapshot,
    pub summary: FrameSummary,
    pub display_list: DisplayList,
    pub rendered_at: DateTime<Utc>,
}

/// Sole owner of the engine, the renderer and the drawing surface
#[derive(Debug)]
pub struct TimerLoop<C> {
    engine: TimerEngine<C, IntervalScheduler>,
    renderer: HourglassRenderer,
    surface: DisplayList,
    readout: String,
}

impl<C: Clock> TimerLoop<C> {
    pub fn new(engine: TimerEngine<C, IntervalScheduler>, width: f32, height: f32) -> Self {
        Self {
            engine,
            renderer: HourglassRenderer::new(),
            surface: DisplayList::new(width, height),
            readout: String::new(),
        }
    }

    /// Apply an action and redraw so the frame reflects it immediately
    pub fn apply(&mut self, action: TimerAction) -> FrameSnapshot {
        match action {
            TimerAction::Configure(minutes) => self.engine.configure(minutes),
            TimerAction::Start => {
                if !self.engine.start() {
                    debug!("Start ignored in {} state", self.engine.status().as_str());
                }
            }
            TimerAction::Pause => {
                if !self.engine.pause() {
                    debug!("Pause ignored in {} state", self.engine.status().as_str());
                }
            }
            TimerAction::Reset => self.engine.reset(),
            TimerAction::Refresh => {}
        }
        self.render()
    }

    /// Handle a periodic tick
    pub fn on_tick(&mut self) -> FrameSnapshot {
        let remaining = self.engine.tick();
        self.draw(remaining)
    }

    /// Draw the current state into the surface
    pub fn render(&mut self) -> FrameSnapshot {
        let remaining = self.engine.remaining();
        self.draw(remaining)
    }

    fn draw(&mut self, remaining: f64) -> FrameSnapshot {
        let now = self.engine.clock().now();
        let input = FrameInput {
            remaining,
            duration: self.engine.duration_seconds(),
            running: self.engine.is_running(),
            now,
        };
        let summary = self.renderer.render(&mut self.surface, &mut self.readout, input);

        FrameSnapshot {
            timer: self.engine.snapshot(),
            summary,
            display_list: self.surface.clone(),
            rendered_at: now,
        }
    }
}

/// Background task that serializes commands and ticks onto one timer
pub async fn timer_loop_task<C: Clock + 'static>(
    mut timer: TimerLoop<C>,
    mut commands: mpsc::Receiver<Command>,
    frames: watch::Sender<FrameSnapshot>,
) {
    info!("Starting timer loop task");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(Command { action, reply }) = command else {
                    info!("Command channel closed, stopping timer loop");
                    break;
                };

                debug!("Timer loop received action: {}", action.name());
                let frame = timer.apply(action);
                publish(&frames, &frame);

                if reply.send(frame).is_err() {
                    warn!("Caller dropped before the {} reply was sent", action.name());
                }
            }

            _ = timer.engine.scheduler_mut().fired() => {
                let was_running = timer.engine.is_running();
                let frame = timer.on_tick();
                if was_running && frame.timer.status == TimerStatus::Expired {
                    info!("Countdown finished");
                }
                publish(&frames, &frame);
            }
        }
    }
}

fn publish(frames: &watch::Sender<FrameSnapshot>, frame: &FrameSnapshot) {
    if let Err(e) = frames.send(frame.clone()) {
        warn!("Failed to publish frame: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct CountingClock {
        inner: ManualClock,
        reads: Arc<AtomicUsize>,
    }

    impl Clock for CountingClock {
        fn now(&self) -> DateTime<Utc> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.now()
        }
    }

    fn timer_loop(clock: &ManualClock) -> TimerLoop<ManualClock> {
        let engine = TimerEngine::new(clock.clone(), IntervalScheduler::new())
            .with_period(Duration::from_millis(5));
        TimerLoop::new(engine, 360.0, 520.0)
    }

    #[tokio::test]
    async fn actions_render_immediately() {
        let clock = ManualClock::at_epoch();
        let mut timer = timer_loop(&clock);

        let frame = timer.apply(TimerAction::Configure(1.0));
        assert_eq!(frame.timer.readout, "01:00");
        assert_eq!(frame.summary.top_lit, 61);
        assert!(!frame.display_list.is_empty());

        let frame = timer.apply(TimerAction::Start);
        assert_eq!(frame.timer.status, TimerStatus::Running);
        assert!(frame.summary.flowing);

        clock.advance_millis(30_000);
        let frame = timer.apply(TimerAction::Pause);
        assert_eq!(frame.timer.status, TimerStatus::Paused);
        assert_eq!(frame.timer.remaining_seconds, 30.0);
        assert!(!frame.summary.flowing);
        assert_eq!(frame.summary.top_fraction, 0.5);
    }

    #[tokio::test]
    async fn refresh_pulls_fresh_remaining() {
        let clock = ManualClock::at_epoch();
        let mut timer = timer_loop(&clock);
        timer.apply(TimerAction::Start);

        clock.advance_millis(1_000);
        let frame = timer.apply(TimerAction::Refresh);
        assert_eq!(frame.timer.remaining_seconds, 1_499.0);
        assert_eq!(frame.timer.readout, "24:59");
    }

    #[tokio::test]
    async fn tick_reads_the_clock_once_for_remaining() {
        let clock = ManualClock::at_epoch();
        let reads = Arc::new(AtomicUsize::new(0));
        let counting = CountingClock { inner: clock.clone(), reads: reads.clone() };
        let engine = TimerEngine::new(counting, IntervalScheduler::new());
        let mut timer = TimerLoop::new(engine, 360.0, 520.0);
        timer.apply(TimerAction::Start);

        clock.advance_millis(2_000);
        reads.store(0, Ordering::SeqCst);
        let frame = timer.on_tick();

        // one read for the deadline arithmetic, one for the frame timestamp
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(frame.timer.remaining_seconds, 1_498.0);
        assert_eq!(frame.rendered_at, clock.now());
    }

    #[tokio::test]
    async fn loop_expires_and_stops_ticking() {
        let clock = ManualClock::at_epoch();
        let mut timer = timer_loop(&clock);
        timer.apply(TimerAction::Configure(1.0));
        let initial = timer.render();

        let (command_tx, command_rx) = mpsc::channel(8);
        let (frame_tx, mut frame_rx) = watch::channel(initial);
        let task = tokio::spawn(timer_loop_task(timer, command_rx, frame_tx));

        let (reply_tx, reply_rx) = oneshot::channel();
        command_tx
            .send(Command { action: TimerAction::Start, reply: reply_tx })
            .await
            .unwrap();
        assert_eq!(reply_rx.await.unwrap().timer.status, TimerStatus::Running);

        clock.advance_millis(60_500);
        let expired = tokio::time::timeout(
            Duration::from_secs(2),
            frame_rx.wait_for(|f| f.timer.status == TimerStatus::Expired),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();

        assert_eq!(expired.timer.remaining_seconds, 0.0);
        assert_eq!(expired.summary.bottom_lit, 61);
        assert_eq!(expired.summary.top_lit, 0);
        assert!(!expired.summary.flowing);

        drop(command_tx);
        tokio::time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();
    }
}
