//! idlewake-api — the HTTP surface of the keep-alive daemon.
//!
//! Axum route handlers over the shared [`Context`], plus static
//! serving of the status page assets for every unmatched path.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/logs` | Recent ping log entries |
//! | GET | `/api/site-status` | One-shot check of the main app URL |
//! | GET | `/api/stats` | Uptime, success rate, average latency |
//! | GET | `/health` | Liveness of the daemon itself |
//! | GET | `/*` | Static assets (status page) |

pub mod handlers;

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;

use idlewake_core::Context;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub ctx: Context,
    pub client: reqwest::Client,
    /// Target of the on-demand site-status check.
    pub main_app_url: String,
    /// Timeout for that check.
    pub site_check_timeout: Duration,
}

impl ApiState {
    pub fn new(ctx: Context, client: reqwest::Client, main_app_url: String) -> Self {
        Self {
            ctx,
            client,
            main_app_url,
            site_check_timeout: Duration::from_secs(10),
        }
    }
}

/// Build the complete router (API + health + static status page).
pub fn build_router(state: ApiState, assets_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/api/logs", get(handlers::get_logs))
        .route("/api/site-status", get(handlers::get_site_status))
        .route("/api/stats", get(handlers::get_stats))
        .route("/health", get(handlers::health))
        .with_state(state);

    match assets_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}
