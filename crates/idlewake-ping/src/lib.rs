//! idlewake-ping — the ping engine for the idlewake keep-alive daemon.
//!
//! Issues the HTTP requests whose only purpose is to keep an idling
//! host awake, and runs the background loops that schedule them.
//!
//! # Architecture
//!
//! ```text
//! monitor (background loops, watch-channel shutdown)
//!   ├── random loop     — random URL, random 5–15 min wait
//!   ├── dedicated loop  — fixed URL, 10 min cadence
//!   └── self loop       — own URL, 13 min cadence
//!         │
//!         ▼
//! checker
//!   ├── ping_url()   — GET with per-attempt timeout + bounded retries
//!   └── check_site() — one-shot status probe, no retries
//! ```
//!
//! A ping "succeeds" when the request completes, whatever the HTTP
//! status — the point is generating activity, not health judgement.
//! The one-shot site check is stricter: it reports "live" only for
//! an exact 200.

pub mod checker;
pub mod monitor;

pub use checker::{PingOptions, SiteStatus, check_site, ping_url};
pub use monitor::{run_dedicated_loop, run_random_loop, run_self_loop};
