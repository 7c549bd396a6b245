//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::DurationConfig;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "podium")]
#[command(about = "A state-managed HTTP server for a stage countdown timer")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Countdown hours
    #[arg(long, default_value = "0")]
    pub hours: u64,

    /// Countdown minutes
    #[arg(short, long, default_value = "1")]
    pub minutes: u64,

    /// Countdown seconds
    #[arg(short, long, default_value = "0")]
    pub seconds: u64,

    /// Warning zone threshold in seconds
    #[arg(short, long, default_value = "10")]
    pub warning: u64,

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
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// The configured countdown duration
    pub fn duration(&self) -> DurationConfig {
        DurationConfig::new(self.hours, self.minutes, self.seconds)
    }
}
