//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::{
    render::to_svg,
    state::AppState,
    tasks::FrameSnapshot,
};
use super::responses::{ApiResponse, HealthResponse, SetRequest, StatusResponse};

fn control_response(
    action: &str,
    result: Result<FrameSnapshot, String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(frame) => {
            info!("{} endpoint called - timer is {} at {}", action, frame.timer.status.as_str(), frame.timer.readout);
            Ok(Json(ApiResponse::new(
                format!("Timer {} handled", action),
                frame.timer,
            )))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /set - Configure the countdown duration
///
/// The body is read leniently: a missing or malformed body configures the
/// default duration instead of being rejected.
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ApiResponse>, StatusCode> {
    let request = SetRequest::from_body(&body);
    control_response("set", state.configure(request.raw_minutes()).await)
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("start", state.start().await)
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("pause", state.pause().await)
}

/// Handle POST /reset - Refill to the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("reset", state.reset().await)
}

/// Handle GET /status - Return a freshly computed timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let frame = match state.refresh().await {
        Ok(frame) => frame,
        Err(e) => {
            error!("Failed to refresh timer: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: frame.timer,
        summary: frame.summary,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /frame.svg - Latest rendered frame as SVG
pub async fn frame_svg_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let frame = state.latest_frame();
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        to_svg(&frame.display_list),
    )
}

/// Handle GET /frame.json - Latest rendered frame as a display list
pub async fn frame_json_handler(State(state): State<Arc<AppState>>) -> Json<FrameSnapshot> {
    Json(state.latest_frame())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
