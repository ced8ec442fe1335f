//! Zmanim Countdown - a clock and sunrise/sunset countdown board
//!
//! This is the main entry point for the zmanim-countdown application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use zmanim_countdown::{
    config::Config,
    state::{AppState, RefreshScope},
    api::create_router,
    services::{http_client, HebcalClient, SefariaClient, SunClient},
    tasks::{clock_task, refresh_task, CalendarRefresher, ZmanimController},
    utils::{shutdown_signal, SystemTimeSource},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("zmanim_countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting zmanim-countdown v{}", env!("CARGO_PKG_VERSION"));
    info!("Location: lat={}, lng={}, timezone={}, language={:?}",
          config.latitude, config.longitude, config.timezone.name(), config.language);

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.timezone,
        config.language,
        &config.hidden_fields,
        Arc::new(SystemTimeSource),
    ));

    let client = http_client()?;
    let controller = ZmanimController::new(
        Arc::clone(&state),
        SunClient::new(
            client.clone(),
            config.sun_api.clone(),
            config.latitude,
            config.longitude,
            config.timezone,
        ),
    );
    let calendar = CalendarRefresher::new(
        Arc::clone(&state),
        SefariaClient::new(client.clone(), config.calendar_api.clone()),
        HebcalClient::new(client, config.converter_api.clone()),
    );

    // Subscribe before the first request so it is not lost
    let requests = state.subscribe_refresh();
    tokio::spawn(refresh_task(requests, controller, calendar));
    tokio::spawn(clock_task(Arc::clone(&state)));

    if let Err(e) = state.request_refresh(RefreshScope::All) {
        warn!("Initial refresh not scheduled: {}", e);
    }

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Board running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /display - Current board fields and clock hands");
    info!("  GET  /status  - Countdown mode, target times and last refresh");
    info!("  POST /refresh - Re-fetch zmanim and calendar");
    info!("  GET  /health  - Health check");

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

    info!("Board shutdown complete");
    Ok(())
}
