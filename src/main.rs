//! Draft Room Back binary entrypoint wiring the REST surface and the
//! player directory supervisor.

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod directory;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use directory::{PlayerDirectory, bundled::BundledDirectory};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let refresh = Duration::from_secs(config.directory_refresh_secs);
    let directory = build_directory(&config);

    let app_state = AppState::new(config);

    tokio::spawn(run_directory_supervisor(
        app_state.clone(),
        directory,
        refresh,
    ));
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the player directory implementation: the HTTP directory when the
/// feature is compiled in and configured, else the bundled JSON file.
fn build_directory(config: &AppConfig) -> Arc<dyn PlayerDirectory> {
    #[cfg(feature = "http-directory")]
    if let Some(result) = directory::http::HttpDirectory::from_env() {
        match result {
            Ok(directory) => {
                info!("using HTTP player directory");
                return Arc::new(directory);
            }
            Err(err) => {
                warn!(error = %err, "failed to build HTTP player directory; using bundled file");
            }
        }
    }

    info!(path = %config.directory_file.display(), "using bundled player directory");
    Arc::new(BundledDirectory::new(config.directory_file.clone()))
}

/// Supervises the default player pool by fetching it in the background,
/// refreshing it periodically, and toggling degraded mode when the
/// directory becomes unreachable.
async fn run_directory_supervisor(
    state: SharedState,
    directory: Arc<dyn PlayerDirectory>,
    refresh: Duration,
) {
    state.install_directory(directory.clone()).await;

    let initial_delay_ms = 1000;
    let mut delay = Duration::from_millis(initial_delay_ms);
    let max_delay = Duration::from_secs(30);

    loop {
        match directory.fetch_pool().await {
            Ok(entries) => {
                // Fresh pool installed: reset the retry backoff and sleep
                // until the next scheduled refresh.
                info!(entries = entries.len(), "default player pool refreshed");
                state.install_default_pool(entries).await;
                delay = Duration::from_millis(initial_delay_ms);
                sleep(refresh).await;
            }
            Err(err) => {
                // Directory unreachable: flip to degraded mode and retry
                // with exponential backoff. Drafts with custom pools keep
                // working off their own data.
                warn!(error = %err, "player directory fetch failed; entering degraded mode");
                state.mark_degraded();
                sleep(delay).await;
                delay = (delay * 2).min(max_delay);
            }
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
