//! Bounded in-memory log of ping outcomes.
//!
//! Every component that wants to record an event pushes a `LogEntry`
//! here. The buffer is FIFO-bounded: appending at capacity evicts the
//! oldest entry, so the API always serves the most recent window.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Default number of entries retained.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A single timestamped event record. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            message: message.into(),
        }
    }
}

/// Capacity-bounded FIFO buffer of log entries.
///
/// `Clone` + `Send` + `Sync` (backed by `Arc<Mutex<_>>`); the loops
/// and the API handlers share one buffer. The mutex is never held
/// across an await point.
#[derive(Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogBuffer {
    /// Create a buffer retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest if the buffer is full.
    pub async fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Point-in-time copy of the buffer, most-recent-last.
    pub async fn snapshot(&self) -> Vec<LogEntry> {
        let entries = self.entries.lock().await;
        entries.iter().cloned().collect()
    }

    /// Number of entries currently retained.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the buffer holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
