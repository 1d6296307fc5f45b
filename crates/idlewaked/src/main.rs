//! idlewaked — the idlewake daemon.
//!
//! Single binary that assembles the keep-alive pinger:
//! - Shared context (log buffer + stats)
//! - Three background ping loops (random, dedicated, self)
//! - HTTP API + static status page
//!
//! # Usage
//!
//! ```text
//! idlewaked --port 3000 --assets public
//! ```
//!
//! URLs come from the environment (`IDLEWAKE_RANDOM_URLS`,
//! `IDLEWAKE_DEDICATED_URL`, `IDLEWAKE_SELF_URL`, `IDLEWAKE_MAIN_URL`),
//! each with a hardcoded default.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use idlewake_core::{Config, Context, config};
use idlewake_ping::monitor::{
    DEDICATED_INTERVAL, RANDOM_MAX_WAIT, RANDOM_MIN_WAIT, SELF_INTERVAL,
};
use idlewake_ping::{PingOptions, run_dedicated_loop, run_random_loop, run_self_loop};

#[derive(Parser)]
#[command(name = "idlewaked", about = "idlewake keep-alive daemon")]
struct Cli {
    /// Port to listen on (overrides the PORT environment variable).
    #[arg(long)]
    port: Option<u16>,

    /// Directory of static status page assets.
    #[arg(long, default_value = "public")]
    assets: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,idlewaked=debug,idlewake=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut cfg = Config::from_env()?;
    if let Some(port) = cli.port {
        cfg.port = port;
    }

    // Every ping target must carry an HTTP scheme before any network
    // request is issued. No retries, no partial startup.
    if let Err(e) = cfg.validate() {
        error!(error = %e, "invalid URL configuration");
        return Err(e.into());
    }

    info!(
        random_urls = cfg.random_urls.len(),
        dedicated_url = %cfg.dedicated_url,
        port = cfg.port,
        "starting keep-alive daemon"
    );

    let ctx = Context::default();
    let client = reqwest::Client::builder()
        .user_agent(concat!("idlewake/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // ── Bind the listener first: the self-ping URL depends on the
    //    actual port (PORT=0 binds an ephemeral one).
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_port = listener.local_addr()?.port();

    let self_url = cfg
        .self_url
        .clone()
        .unwrap_or_else(|| format!("http://localhost:{local_port}"));
    if let Err(e) = config::validate_url(&self_url) {
        error!(error = %e, "invalid self-ping URL");
        return Err(e.into());
    }
    ctx.set_self_url(self_url).await;

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Start ping loops ───────────────────────────────────────

    let opts = PingOptions::default();

    let random_handle = tokio::spawn(run_random_loop(
        ctx.clone(),
        client.clone(),
        cfg.random_urls.clone(),
        RANDOM_MIN_WAIT,
        RANDOM_MAX_WAIT,
        opts.clone(),
        shutdown_rx.clone(),
    ));

    let dedicated_handle = tokio::spawn(run_dedicated_loop(
        ctx.clone(),
        client.clone(),
        cfg.dedicated_url.clone(),
        DEDICATED_INTERVAL,
        opts.clone(),
        shutdown_rx.clone(),
    ));

    let self_handle = tokio::spawn(run_self_loop(
        ctx.clone(),
        client.clone(),
        SELF_INTERVAL,
        opts,
        shutdown_rx,
    ));

    info!("ping loops started");

    // ── Start API server ───────────────────────────────────────

    let state = idlewake_api::ApiState::new(ctx, client, cfg.main_app_url.clone());
    let assets = cli.assets.is_dir().then(|| cli.assets.clone());
    if assets.is_none() {
        info!(dir = ?cli.assets, "assets directory not found, status page disabled");
    }
    let router = idlewake_api::build_router(state, assets);

    info!(port = local_port, "API server starting");

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    // Wait for the loops to notice the shutdown signal.
    let _ = random_handle.await;
    let _ = dedicated_handle.await;
    let _ = self_handle.await;

    info!("keep-alive daemon stopped");
    Ok(())
}
