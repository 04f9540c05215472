//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "sandglass")]
#[command(about = "An hourglass countdown timer with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20553")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial countdown length in minutes (clamped to 1-180)
    #[arg(short, long, default_value = "25")]
    pub minutes: f64,

    /// Milliseconds between timer ticks
    #[arg(long, default_value = "90", value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub tick_ms: u64,

    /// Drawing surface width in pixels
    #[arg(long, default_value = "360", value_parser = clap::value_parser!(u32).range(200..=4096))]
    pub width: u32,

    /// Drawing surface height in pixels
    #[arg(long, default_value = "520", value_parser = clap::value_parser!(u32).range(440..=4096))]
    pub height: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Period between timer ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Surface size as floating point pixels
    pub fn surface_size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}
