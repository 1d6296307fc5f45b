//! idlewake-core — shared state for the idlewake keep-alive daemon.
//!
//! Holds everything the ping loops and the API server share:
//! the bounded in-memory log buffer, the ping statistics
//! accumulator, and the configuration loaded at startup.
//!
//! # Architecture
//!
//! ```text
//! Context (Clone, Arc-backed)
//!   ├── LogBuffer   — FIFO ring of LogEntry, capacity-bounded
//!   ├── Stats       — atomic counters, report derived on read
//!   └── self URL    — set once after the listener binds
//! ```
//!
//! The `Context` is handed to every ping loop and every API handler
//! at startup; nothing in this workspace reaches for process-wide
//! globals.

pub mod config;
pub mod context;
pub mod error;
pub mod log;
pub mod stats;

pub use config::Config;
pub use context::Context;
pub use error::{ConfigError, ConfigResult};
pub use log::{LogBuffer, LogEntry, Severity};
pub use stats::{Stats, StatsReport};
