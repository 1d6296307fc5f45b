//! API handlers.
//!
//! Every handler reads through the shared [`Context`]; the backing
//! store is in-memory, so the reads themselves cannot fail — failures
//! the handlers surface are those of the remote site being checked,
//! and those are part of the success-shaped response body.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use idlewake_ping::check_site;

use crate::ApiState;

/// GET /api/logs
pub async fn get_logs(State(state): State<ApiState>) -> Json<Value> {
    let logs = state.ctx.recent_logs().await;
    Json(json!({ "logs": logs }))
}

/// GET /api/site-status
///
/// Performs the one-shot check synchronously; a down site is still a
/// 200 response with `isLive: false` and the failure reason.
pub async fn get_site_status(State(state): State<ApiState>) -> Json<idlewake_ping::SiteStatus> {
    let status = check_site(
        &state.ctx,
        &state.client,
        &state.main_app_url,
        state.site_check_timeout,
    )
    .await;
    Json(status)
}

/// GET /api/stats
pub async fn get_stats(State(state): State<ApiState>) -> Json<idlewake_core::StatsReport> {
    Json(state.ctx.stats_report())
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "timestamp": Utc::now() }))
}
