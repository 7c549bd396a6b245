//! Podium - A state-managed HTTP server for a stage countdown timer
//!
//! This is the main entry point for the podium application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use podium::{
    api::create_router,
    config::Config,
    services::TerminalBell,
    state::AppState,
    tasks::{countdown_task, glitch_sampler_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("podium={},tower_http=info", config.log_level()))
        .init();

    info!("Starting podium server v1.0.0");
    info!(
        "Configuration: host={}, port={}, duration={}s, warning={}s",
        config.host,
        config.port,
        config.duration().total_seconds(),
        config.warning
    );

    // Create application state with the terminal-bell sound backend
    let sounds = Arc::new(TerminalBell::new());
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.duration(),
        config.warning,
        sounds,
    ));

    // Start the countdown tick loop
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });

    // Start the glitch sampler
    let sampler_state = Arc::clone(&state);
    tokio::spawn(async move {
        glitch_sampler_task(sampler_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /start            - Start or resume the countdown");
    info!("  POST   /pause            - Pause the countdown");
    info!("  POST   /reset            - Reset to the configured duration");
    info!("  POST   /mute             - Suppress audio alerts");
    info!("  POST   /unmute           - Restore audio alerts");
    info!("  PUT    /config/duration  - Set the countdown duration");
    info!("  PUT    /config/warning   - Set the warning threshold");
    info!("  GET    /alerts           - List alert rules");
    info!("  POST   /alerts           - Add an alert rule");
    info!("  DELETE /alerts/:id       - Remove an alert rule");
    info!("  GET    /status           - Current session and display");
    info!("  GET    /health           - Health check");

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
