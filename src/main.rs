//! Sandglass - an hourglass countdown timer
//!
//! This is the main entry point for the sandglass server.

use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
};
use tracing::info;

use sandglass::{
    api::create_router,
    config::Config,
    state::{AppState, TimerEngine},
    tasks::{timer_loop_task, TimerLoop},
    time::{IntervalScheduler, SystemClock},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sandglass={},tower_http=info", config.log_level()))
        .init();

    info!("Starting sandglass server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, minutes={}, tick={}ms, surface={}x{}",
          config.host, config.port, config.minutes, config.tick_ms, config.width, config.height);

    // The timer loop owns the engine; everything else talks to it over channels
    let mut engine = TimerEngine::new(SystemClock, IntervalScheduler::new())
        .with_period(config.tick_period());
    engine.configure(config.minutes);

    let (width, height) = config.surface_size();
    let mut timer = TimerLoop::new(engine, width, height);
    let (command_tx, command_rx) = mpsc::channel(32);
    let (frame_tx, frame_rx) = watch::channel(timer.render());

    tokio::spawn(async move {
        timer_loop_task(timer, command_rx, frame_tx).await;
    });

    let state = Arc::new(AppState::new(config.port, config.host.clone(), command_tx, frame_rx));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /set        - Set duration, body {{\"minutes\": 25}}");
    info!("  POST /start      - Start or resume the countdown");
    info!("  POST /pause      - Pause the countdown");
    info!("  POST /reset      - Refill to the configured duration");
    info!("  GET  /status     - Current timer status");
    info!("  GET  /frame.svg  - Latest hourglass frame as SVG");
    info!("  GET  /frame.json - Latest hourglass frame as a display list");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
