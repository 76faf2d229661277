//! Grid Node - Main Entry Point
//!
//! Resolves the node's outbound address, freezes the registration
//! envelope, and runs the heartbeat loop until SIGINT/SIGTERM.

use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use grid_node::config::Settings;
use grid_node::registration::{build_envelope, resolve_outbound_address, HeartbeatDriver, NodeIdentity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with RUST_LOG environment variable support
    // Default: info level for grid_node, warn for everything else
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,grid_node=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}, using defaults", e);
        Settings::default()
    });

    info!("Starting grid-node v{}", grid_node::VERSION);
    info!("Hub: {}", settings.hub.url);
    info!("Listen address: {}", settings.node.listen_address);

    // Without an outbound address the node has no identity; abort.
    let resolved_ip =
        resolve_outbound_address().context("cannot determine outbound address")?;
    info!("Resolved outbound address: {}", resolved_ip);

    // Point-in-time capacity snapshot; frozen into the envelope below
    let catalog = settings.catalog.snapshot();
    info!(
        "Capacity snapshot: {} total sessions, {} browser/version pairs",
        catalog.total_sessions,
        catalog.version_count()
    );

    let identity = NodeIdentity {
        name: settings.node.name.clone(),
        description: settings.node.description.clone(),
    };
    let envelope = build_envelope(
        &identity,
        &catalog,
        resolved_ip,
        &settings.node.listen_address,
        settings.node.browser_timeout_sec,
    )
    .context("cannot build registration envelope")?;

    let driver = HeartbeatDriver::new(
        settings.hub.url.clone(),
        &envelope,
        Duration::from_secs(settings.heartbeat.interval_sec),
        Duration::from_secs(settings.heartbeat.client_timeout_sec),
    )
    .context("cannot create heartbeat driver")?;

    info!("Node id: {}", driver.node_id());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_termination().await;
        info!("Termination signal received, shutting down");
        let _ = shutdown_tx.send(true);
    });

    driver.run(shutdown_rx).await;

    Ok(())
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}
