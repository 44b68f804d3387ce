//! Aleto prediction relay
//!
//! Entry point: configuration loading, tracing, and HTTP server startup.

use std::sync::Arc;

use aleto_upstream::UpstreamClient;
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use aleto_proxy::reset_keys::ResetKeyTable;
use aleto_proxy::state::AppState;

mod cli;
mod config_helpers;
mod tracing_setup;

use cli::CliArgs;
use config_helpers::parse_bind_address;
use tracing_setup::install_tracing_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = load_config(args.config_path.as_deref())?;
    install_tracing_from_config(&config.logging);

    tracing::info!(
        cors_allow_all = config.cors.allow_all_origins,
        cors_origins = config.cors.allowed_origins.len(),
        "configuration loaded"
    );

    let upstream = UpstreamClient::new(
        &config.upstream.base_url,
        config.upstream.api_token().map(str::to_string),
    )
    .context("failed to build upstream client")?;

    tracing::info!(base_url = %upstream.base_url(), "upstream client ready");
    if !upstream.has_credential() {
        tracing::warn!("upstream API token is not set; prediction requests will fail with 500");
    }

    let reset_keys = ResetKeyTable::builtin();
    if reset_keys.is_empty() {
        tracing::warn!("reset key table is empty; every reset key will be rejected");
    } else {
        tracing::debug!(keys = reset_keys.len(), "reset key table loaded");
    }

    let state = Arc::new(AppState::new(upstream, reset_keys));
    let app = aleto_proxy::build_router_with_cors(state, &config.cors);

    let addr = parse_bind_address(&config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Load and validate configuration from file (if any) and environment.
fn load_config(path: Option<&str>) -> anyhow::Result<aleto_config::Config> {
    let config = aleto_config::load_config(path)
        .with_context(|| format!("failed to load configuration from {path:?}"))?;
    aleto_config::validate_config(&config).context("invalid configuration")?;
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(%e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(%e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
