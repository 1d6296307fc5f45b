//! Background ping loops.
//!
//! Three independent forever-loops, each running on its own task and
//! watching a shared shutdown channel. Within one loop, the next ping
//! never starts before the previous retry sequence and its logging
//! fully complete; across loops, interleaving is unconstrained.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tracing::debug;

use idlewake_core::{Context, Severity};

use crate::checker::{PingOptions, ping_url};

/// Lower bound of the random loop's wait.
pub const RANDOM_MIN_WAIT: Duration = Duration::from_secs(5 * 60);
/// Upper bound of the random loop's wait.
pub const RANDOM_MAX_WAIT: Duration = Duration::from_secs(15 * 60);
/// Fixed cadence of the dedicated loop.
pub const DEDICATED_INTERVAL: Duration = Duration::from_secs(10 * 60);
/// Fixed cadence of the self-ping loop.
pub const SELF_INTERVAL: Duration = Duration::from_secs(13 * 60);

/// Ping a uniformly random URL from `urls`, then sleep a uniformly
/// random duration in `[min_wait, max_wait]`, forever.
pub async fn run_random_loop(
    ctx: Context,
    client: reqwest::Client,
    urls: Vec<String>,
    min_wait: Duration,
    max_wait: Duration,
    opts: PingOptions,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!(urls = urls.len(), "random ping loop starting");

    loop {
        // ThreadRng is not Send; keep it out of the await scope.
        let url = {
            let mut rng = rand::rng();
            urls[rng.random_range(0..urls.len())].clone()
        };

        if !ping_url(&ctx, &client, &url, &opts).await {
            ctx.log(Severity::Warning, format!("Failed to ping {url} after retries"))
                .await;
        }

        let wait = random_wait(min_wait, max_wait);
        ctx.log(
            Severity::Info,
            format!(
                "Waiting {:.1} minutes before next random ping...",
                wait.as_secs_f64() / 60.0
            ),
        )
        .await;

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = shutdown.changed() => {
                debug!("random ping loop shutting down");
                break;
            }
        }
    }
}

/// Ping the dedicated URL on a fixed cadence, forever.
pub async fn run_dedicated_loop(
    ctx: Context,
    client: reqwest::Client,
    url: String,
    interval: Duration,
    opts: PingOptions,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!(%url, "dedicated ping loop starting");

    loop {
        if !ping_url(&ctx, &client, &url, &opts).await {
            ctx.log(
                Severity::Warning,
                format!("Failed to ping dedicated URL {url} after retries"),
            )
            .await;
        }

        ctx.log(
            Severity::Info,
            format!(
                "Waiting {:.1} minutes before next dedicated ping...",
                interval.as_secs_f64() / 60.0
            ),
        )
        .await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => {
                debug!("dedicated ping loop shutting down");
                break;
            }
        }
    }
}

/// Ping the daemon's own URL on a fixed cadence, forever.
///
/// Until the server has bound and published its URL, iterations log a
/// warning and skip the network call instead of failing.
pub async fn run_self_loop(
    ctx: Context,
    client: reqwest::Client,
    interval: Duration,
    opts: PingOptions,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!("self ping loop starting");

    loop {
        match ctx.self_url().await {
            Some(url) => {
                if !ping_url(&ctx, &client, &url, &opts).await {
                    ctx.log(
                        Severity::Warning,
                        format!("Failed to self-ping {url} after retries"),
                    )
                    .await;
                }
            }
            None => {
                ctx.log(
                    Severity::Warning,
                    "Self-ping skipped: server URL not known yet",
                )
                .await;
            }
        }

        ctx.log(
            Severity::Info,
            format!(
                "Waiting {:.1} minutes before next self-ping...",
                interval.as_secs_f64() / 60.0
            ),
        )
        .await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => {
                debug!("self ping loop shutting down");
                break;
            }
        }
    }
}

/// Uniform random duration in `[min, max]`, inclusive on both ends.
fn random_wait(min: Duration, max: Duration) -> Duration {
    if min >= max {
        return min;
    }
    let mut rng = rand::rng();
    let ms = rng.random_range(min.as_millis()..=max.as_millis()) as u64;
    Duration::from_millis(ms)
}
