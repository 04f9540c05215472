//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

use crate::tasks::{Command, FrameSnapshot, TimerAction};

/// Handle shared by HTTP handlers. Holds no timer state of its own; every
/// request goes through the timer loop.
#[derive(Debug)]
pub struct AppState {
    /// Commands for the timer loop
    commands: mpsc::Sender<Command>,
    /// Latest frame published by the timer loop
    frames: watch::Receiver<FrameSnapshot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState wired to a running timer loop
    pub fn new(
        port: u16,
        host: String,
        commands: mpsc::Sender<Command>,
        frames: watch::Receiver<FrameSnapshot>,
    ) -> Self {
        Self {
            commands,
            frames,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Send an action to the timer loop and wait for the frame it produced
    pub async fn dispatch(&self, action: TimerAction) -> Result<FrameSnapshot, String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command { action, reply: reply_tx })
            .await
            .map_err(|e| format!("Failed to reach timer loop: {}", e))?;

        let frame = reply_rx
            .await
            .map_err(|e| format!("Timer loop dropped the {} reply: {}", action.name(), e))?;

        if action.is_control() {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.name().to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        Ok(frame)
    }

    /// Set the countdown duration from raw minutes
    pub async fn configure(&self, minutes: f64) -> Result<FrameSnapshot, String> {
        info!("Setting timer duration from input: {}", minutes);
        self.dispatch(TimerAction::Configure(minutes)).await
    }

    pub async fn start(&self) -> Result<FrameSnapshot, String> {
        self.dispatch(TimerAction::Start).await
    }

    pub async fn pause(&self) -> Result<FrameSnapshot, String> {
        self.dispatch(TimerAction::Pause).await
    }

    pub async fn reset(&self) -> Result<FrameSnapshot, String> {
        self.dispatch(TimerAction::Reset).await
    }

    /// Fresh frame with remaining time pulled from the clock
    pub async fn refresh(&self) -> Result<FrameSnapshot, String> {
        self.dispatch(TimerAction::Refresh).await
    }

    /// Most recent frame the timer loop published, without waiting
    pub fn latest_frame(&self) -> FrameSnapshot {
        self.frames.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
