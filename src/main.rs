//! TickGate server: realtime market-data gateway
//!
//! Main entry point that wires all crates together and starts the server.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use tickgate_auth::AuthGate;
use tickgate_auth::jwt::JwtEncoder;
use tickgate_auth::validator::build_validator;
use tickgate_cache::RateStoreManager;
use tickgate_core::config::AppConfig;
use tickgate_core::types::Principal;
use tickgate_realtime::RealtimeEngine;

use cli::{Cli, Commands, TokenArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Token(args)) => issue_token(&config, &args),
        Some(Commands::Serve) | None => {
            init_logging(&config);
            run(config).await
        }
    };

    if let Err(e) = result {
        tracing::error!("Server error: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Print a signed token for the given principal.
fn issue_token(config: &AppConfig, args: &TokenArgs) -> anyhow::Result<()> {
    let encoder = JwtEncoder::new(&config.auth);
    let principal = Principal {
        id: args.user_id.clone(),
        email: args.email.clone(),
    };

    let issued = match args.ttl_minutes {
        Some(minutes) => encoder.issue(&principal, chrono::Duration::minutes(minutes)),
        None => encoder.issue_default(&principal),
    }
    .context("failed to mint token")?;

    println!("{}", issued.token);
    eprintln!("expires at {}", issued.expires_at.to_rfc3339());
    Ok(())
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting TickGate v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(config);
    let grace = config.server.shutdown_grace();

    // Cancelled by a signal or by the hub supervisor.
    let root = CancellationToken::new();

    // ── Step 1: Rate store ───────────────────────────────────────
    tracing::info!("Initializing rate store (provider: {})...", config.cache.provider);
    let store = RateStoreManager::new(&config.cache)
        .await
        .context("rate store initialization failed")?;
    let store_name = store.provider_name();
    let maintenance = store.spawn_maintenance(root.child_token());
    let store = Arc::new(store);

    // ── Step 2: Auth gate ────────────────────────────────────────
    let gate = AuthGate::new(build_validator(&config.auth));

    // ── Step 3: Realtime hub ─────────────────────────────────────
    let realtime = Arc::new(RealtimeEngine::start(config.realtime.clone(), root.clone()));
    tracing::info!("Realtime engine started");

    // ── Step 4: Router ───────────────────────────────────────────
    let state = tickgate_api::AppState::new(
        Arc::clone(&config),
        gate,
        store,
        store_name,
        Arc::clone(&realtime),
    )
    .context("failed to build application state")?;
    let app = tickgate_api::build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("TickGate listening on {}", addr);

    // ── Step 5: Serve until shutdown ─────────────────────────────
    let shutdown_root = root.clone();
    let shutdown_engine = Arc::clone(&realtime);
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        tokio::select! {
            _ = shutdown_signal() => {
                tracing::info!("Shutdown signal received, starting graceful shutdown...");
            }
            _ = shutdown_root.cancelled() => {
                tracing::warn!("Internal shutdown requested");
            }
        }
        shutdown_root.cancel();
        shutdown_engine.shutdown().await;
    });
    let mut server = tokio::spawn(async move { serve.await });

    let served = tokio::select! {
        res = &mut server => res,
        _ = root.cancelled() => match tokio::time::timeout(grace, &mut server).await {
            Ok(res) => res,
            Err(_) => {
                tracing::warn!(grace_seconds = grace.as_secs(), "Drain timed out, aborting");
                server.abort();
                Ok(Ok(()))
            }
        },
    };

    // Stop background tasks even when the server exited on its own.
    root.cancel();
    if let Some(handle) = maintenance {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    served
        .context("server task panicked")?
        .context("server error")?;

    tracing::info!("TickGate shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
}
