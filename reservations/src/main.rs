//! Alrock reservations HTTP server.

use alrock_core::environment::SystemClock;
use alrock_reservations::{
    Restaurant, RestaurantEnvironment,
    admin::AdminGate,
    api::{AppState, build_router},
    build_store,
    config::Config,
    metrics::register_business_metrics,
};
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (reads .env first)
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},alrock_reservations=debug", config.server.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Alrock reservations server");

    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;
    register_business_metrics();

    let settings = config.booking.settings()?;
    info!(
        table_hold_minutes = config.booking.table_hold_minutes,
        reset_delay_ms = config.booking.reset_delay_ms,
        utc_offset = %settings.utc_offset,
        "Configuration loaded"
    );

    let admin = AdminGate::new(config.admin.password.clone());
    if admin.is_default() {
        warn!("ADMIN_PASSWORD is not set; the admin routes accept the default password");
    }

    let clock = Arc::new(SystemClock);
    let environment = RestaurantEnvironment::live(clock.clone(), settings);
    let store = Arc::new(build_store(Restaurant::seeded(settings.utc_offset)?, environment));

    let state = AppState::new(
        Arc::clone(&store),
        Arc::new(admin),
        clock,
        settings,
        Duration::from_millis(config.server.request_timeout_ms),
    );

    let app = build_router(state).route(
        "/metrics",
        get(move || std::future::ready(prometheus_handle.render())),
    );

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let booking resets and cancellation outcomes finish
    if let Err(error) = store
        .shutdown(Duration::from_secs(config.server.shutdown_timeout))
        .await
    {
        warn!(%error, "Store shut down with effects still running");
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
