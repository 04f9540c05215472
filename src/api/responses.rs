//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{value::RawValue, Value};
use tracing::debug;

use crate::{
    render::FrameSummary,
    state::{timer_state::parse_minutes, TimerSnapshot},
};

/// Body of `POST /set`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SetRequest {
    /// Minutes as a number or a numeric string; anything else means default.
    /// Kept as raw JSON so literals outside `f64` range still parse.
    #[serde(default)]
    pub minutes: Option<Box<RawValue>>,
}

impl SetRequest {
    /// Read a request body, treating anything unreadable as an empty request
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|e| {
            debug!("Unreadable set body, using default minutes: {}", e);
            Self::default()
        })
    }

    /// Raw minutes, NaN when the value is not numeric
    pub fn raw_minutes(&self) -> f64 {
        let Some(raw) = &self.minutes else {
            return f64::NAN;
        };
        match serde_json::from_str::<Value>(raw.get()) {
            Ok(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Ok(Value::String(s)) => parse_minutes(&s),
            Ok(_) => f64::NAN,
            // number literal too large for f64, e.g. 1e400
            Err(_) => parse_minutes(raw.get()),
        }
    }
}

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a response describing the timer after an action
    pub fn new(message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: timer.status.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with rendering and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub summary: FrameSummary,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
