//! Periodic tick scheduling port

use std::{future, time::Duration};

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Identifies one periodic tick stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Start/cancel capability for a recurring tick.
///
/// The scheduler only decides *when* a tick is due; whoever owns the engine
/// calls `tick()` when that happens.
pub trait Scheduler {
    fn start_periodic(&mut self, period: Duration) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

/// Scheduler backed by a tokio interval. At most one stream is live.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    next_id: u64,
    active: Option<(TickHandle, Interval)>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tick stream is currently running
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Wait for the next tick of the live stream.
    ///
    /// Never resolves while no stream is active, which makes it safe to use as
    /// a `tokio::select!` branch.
    pub async fn fired(&mut self) -> TickHandle {
        match self.active.as_mut() {
            Some((handle, interval)) => {
                interval.tick().await;
                *handle
            }
            None => future::pending().await,
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn start_periodic(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if let Some((previous, _)) = self.active.replace((handle, interval)) {
            debug!("Replacing tick stream {} with {}", previous.id(), handle.id());
        } else {
            debug!("Started tick stream {} every {:?}", handle.id(), period);
        }
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if matches!(self.active, Some((live, _)) if live == handle) {
            self.active = None;
            debug!("Cancelled tick stream {}", handle.id());
        }
    }
}

/// Scheduler that never fires on its own; tests call `tick()` by hand and
/// inspect which streams are live.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: Vec<TickHandle>,
    period: Option<Duration>,
    started: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tick streams
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Total number of streams ever started
    pub fn started(&self) -> usize {
        self.started
    }

    /// Period requested by the last start
    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Scheduler for ManualScheduler {
    fn start_periodic(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.active.push(handle);
        self.period = Some(period);
        self.started += 1;
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.active.retain(|live| *live != handle);
    }
}
