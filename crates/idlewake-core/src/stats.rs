//! Ping statistics — running counters with a derive-on-read report.
//!
//! Counters are atomics so the loops can record outcomes without
//! locking; uptime, success rate, and average latency are computed
//! only when a report is requested, never stored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Running counters for ping outcomes.
///
/// One ping sequence (including its retries) counts as a single ping:
/// `record_success` and `record_failure` are each called at most once
/// per sequence, after the terminal outcome.
pub struct Stats {
    started_at: Instant,
    ping_count: AtomicU64,
    success_count: AtomicU64,
    total_response_ms: AtomicU64,
}

/// Display-formatted statistics, shaped for `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub uptime: String,
    pub success_rate: String,
    pub response_time: String,
}

impl Stats {
    /// Create a fresh accumulator; the start instant is fixed here.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            ping_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            total_response_ms: AtomicU64::new(0),
        }
    }

    /// Record a ping sequence that ended in a completed response.
    pub fn record_success(&self, response_ms: u64) {
        self.ping_count.fetch_add(1, Ordering::Relaxed);
        self.success_count.fetch_add(1, Ordering::Relaxed);
        self.total_response_ms.fetch_add(response_ms, Ordering::Relaxed);
    }

    /// Record a ping sequence that exhausted all retries.
    pub fn record_failure(&self) {
        self.ping_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Total ping sequences recorded.
    pub fn ping_count(&self) -> u64 {
        self.ping_count.load(Ordering::Relaxed)
    }

    /// Total successful ping sequences recorded.
    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::Relaxed)
    }

    /// Derive the display report from the current counters.
    pub fn report(&self) -> StatsReport {
        let pings = self.ping_count.load(Ordering::Relaxed);
        let successes = self.success_count.load(Ordering::Relaxed);
        let total_ms = self.total_response_ms.load(Ordering::Relaxed);

        let uptime_days = self.started_at.elapsed().as_millis() as f64 / MILLIS_PER_DAY;

        let success_rate = if pings == 0 {
            "0%".to_string()
        } else {
            format!("{:.2}%", successes as f64 / pings as f64 * 100.0)
        };

        let avg_ms = if successes == 0 { 0 } else { total_ms / successes };

        StatsReport {
            uptime: format!("{uptime_days:.2} days"),
            success_rate,
            response_time: format!("{avg_ms}ms"),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}
