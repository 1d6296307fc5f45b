//! Runtime context — the one shared handle passed to every component.
//!
//! Bundles the log buffer, the stats accumulator, and the lazily-set
//! self-ping URL. `Clone` + `Send` + `Sync` (Arc-backed) so the ping
//! loops and the API handlers all hold the same state without any
//! process-wide globals.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::log::{DEFAULT_LOG_CAPACITY, LogBuffer, LogEntry, Severity};
use crate::stats::{Stats, StatsReport};

#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    logs: LogBuffer,
    stats: Stats,
    /// Unset until the listener binds; transitions once.
    self_url: RwLock<Option<String>>,
}

impl Context {
    /// Create a context with the given log capacity.
    pub fn new(log_capacity: usize) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                logs: LogBuffer::new(log_capacity),
                stats: Stats::new(),
                self_url: RwLock::new(None),
            }),
        }
    }

    /// Record an event in the log buffer and mirror it to tracing,
    /// so operators see the real text in the log stream.
    pub async fn log(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info | Severity::Success => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
        self.inner.logs.push(LogEntry::now(severity, message)).await;
    }

    /// Point-in-time copy of the log buffer, most-recent-last.
    pub async fn recent_logs(&self) -> Vec<LogEntry> {
        self.inner.logs.snapshot().await
    }

    /// The stats accumulator.
    pub fn stats(&self) -> &Stats {
        &self.inner.stats
    }

    /// Derive the display stats report.
    pub fn stats_report(&self) -> StatsReport {
        self.inner.stats.report()
    }

    /// Publish the externally reachable self-ping URL.
    pub async fn set_self_url(&self, url: String) {
        *self.inner.self_url.write().await = Some(url);
    }

    /// The self-ping URL, if the server has bound yet.
    pub async fn self_url(&self) -> Option<String> {
        self.inner.self_url.read().await.clone()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_lands_in_buffer() {
        let ctx = Context::new(10);
        ctx.log(Severity::Success, "pinged something").await;

        let logs = ctx.recent_logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, Severity::Success);
        assert_eq!(logs[0].message, "pinged something");
    }

    #[tokio::test]
    async fn self_url_transitions_from_unset_to_set() {
        let ctx = Context::new(10);
        assert_eq!(ctx.self_url().await, None);

        ctx.set_self_url("http://localhost:3000".to_string()).await;
        assert_eq!(ctx.self_url().await.as_deref(), Some("http://localhost:3000"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let ctx = Context::new(10);
        let clone = ctx.clone();

        clone.log(Severity::Info, "from the clone").await;
        clone.stats().record_success(25);

        assert_eq!(ctx.recent_logs().await.len(), 1);
        assert_eq!(ctx.stats().success_count(), 1);
    }
}
