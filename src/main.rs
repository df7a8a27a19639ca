//! Exam Timetable - cache-aside scraper for university exam listings

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exam_timetable::api::{create_router, AppState};
use exam_timetable::cache::{self, ConnectedStore, KeyValueStore};
use exam_timetable::config::Config;
use exam_timetable::scrape::{HttpSource, Scraper};
use exam_timetable::service::ExamService;
use exam_timetable::tasks::spawn_cleanup_task;

/// Main entry point for the exam timetable service.
///
/// # Startup Sequence
/// 1. Load `.env` and initialize tracing
/// 2. Load configuration from environment variables
/// 3. Connect the cache store (and start the TTL sweep for the memory backend)
/// 4. Build the upstream client and the exam service
/// 5. Serve the HTTP API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exam_timetable=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting exam timetable service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_url={}, cache_ttl={}s, upstream_timeout={}s, port={}",
        config.cache_url, config.cache_ttl, config.upstream_timeout, config.server_port
    );

    let (store, cleanup_handle) = match cache::connect(&config).await? {
        ConnectedStore::Memory(store) => {
            let handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);
            (Arc::new(store) as Arc<dyn KeyValueStore>, Some(handle))
        }
        ConnectedStore::Shared(store) => (store, None),
    };
    info!("Cache store initialized, keys expire in {}s", config.cache_ttl);

    let source = HttpSource::from_config(&config)?;
    let service = ExamService::new(store, Scraper::new(Arc::new(source)), config.cache_ttl);

    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<tokio::task::JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
