//! Order Cache - order lookup and ingestion service
//!
//! Wires the cache, resolver, ingestion loop and HTTP server together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::ingest::{
    dead_letter_channel, message_channel, Message, HEADER_ERROR, HEADER_ORIGIN_TOPIC,
};
use order_cache::producer::publish_samples;
use order_cache::{
    create_router, spawn_refresh_task, AppState, Config, InMemoryRepository, IngestionLoop,
};

/// Main entry point for the order service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build repository, cache and resolver, then warm the cache
/// 4. Start the ingestion loop, dead-letter drain and refresh task
/// 5. Publish demo orders if requested
/// 6. Serve HTTP until SIGINT/SIGTERM, then stop background work
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order cache service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, warm_limit={}, port={}, topic={}, dlq={:?}",
        config.cache_capacity,
        config.cache_warm_limit,
        config.server_port,
        config.source_topic,
        config.dead_letter_topic
    );

    let repo = Arc::new(InMemoryRepository::new());
    let state = AppState::from_config(&config, repo);

    match state.service.update_cache().await {
        Ok(loaded) => info!(loaded, "cache warmed"),
        Err(e) => warn!(error = %e, "cache warm-up failed, starting cold"),
    }

    // Ingestion
    let shutdown = CancellationToken::new();
    let (publisher, source) = message_channel(config.source_topic.clone(), config.channel_capacity);
    let mut ingestion = IngestionLoop::new(source, state.service.clone());
    let mut background: Vec<JoinHandle<()>> = Vec::new();

    if let Some(topic) = &config.dead_letter_topic {
        let (sink, rx) = dead_letter_channel(topic.clone(), config.channel_capacity);
        ingestion = ingestion.with_dead_letter(Arc::new(sink));
        background.push(tokio::spawn(drain_dead_letters(rx)));
        info!(topic = %topic, "dead-lettering enabled");
    }

    let ingestion_handle = tokio::spawn(ingestion.run(shutdown.clone()));

    if config.refresh_interval > 0 {
        background.push(spawn_refresh_task(
            state.service.clone(),
            config.refresh_interval,
        ));
        info!("Background cache refresh task started");
    }

    if config.demo_orders > 0 {
        publish_samples(&publisher, config.demo_orders)
            .await
            .context("publishing demo orders")?;
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("http server failed")?;

    shutdown.cancel();
    match ingestion_handle.await {
        Ok(Ok(stats)) => info!(
            received = stats.received,
            committed = stats.committed,
            dead_lettered = stats.dead_lettered,
            "ingestion finished"
        ),
        Ok(Err(e)) => error!(error = %e, "ingestion ended with error"),
        Err(e) => error!(error = %e, "ingestion task panicked"),
    }
    // Held until the loop has stopped so it never observes a closed topic
    drop(publisher);
    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");

    info!("Server shutdown complete");
    Ok(())
}

/// Logs every diverted message until the dead-letter channel closes.
async fn drain_dead_letters(mut rx: mpsc::Receiver<Message>) {
    while let Some(message) = rx.recv().await {
        error!(
            key = %message.key_lossy(),
            origin = message.header_str(HEADER_ORIGIN_TOPIC).unwrap_or(""),
            error = message.header_str(HEADER_ERROR).unwrap_or(""),
            bytes = message.value.len(),
            "dead-lettered message"
        );
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then cancels ingestion.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    shutdown.cancel();
}
