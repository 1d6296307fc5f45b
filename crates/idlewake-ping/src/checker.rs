//! Ping and site-check primitives.
//!
//! `ping_url` retries transient failures with a fixed delay and
//! records every outcome in the shared log; `check_site` is a single
//! probe with no retries, used only by the on-demand API endpoint.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use idlewake_core::{Context, Severity};

/// Knobs for one retry-ping sequence.
#[derive(Debug, Clone)]
pub struct PingOptions {
    /// Maximum attempts per sequence.
    pub retries: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Per-attempt request timeout.
    pub timeout: Duration,
}

impl Default for PingOptions {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: Duration::from_millis(5000),
            timeout: Duration::from_millis(10_000),
        }
    }
}

/// GET a URL, retrying on failure up to `opts.retries` attempts.
///
/// Any completed response counts as success regardless of status
/// code. Latency is measured from the first attempt's start to the
/// terminal successful response, so retries are included. Counters
/// move exactly once per sequence: success or (after exhaustion)
/// failure.
pub async fn ping_url(
    ctx: &Context,
    client: &reqwest::Client,
    url: &str,
    opts: &PingOptions,
) -> bool {
    let started = Instant::now();

    for attempt in 1..=opts.retries {
        match client.get(url).timeout(opts.timeout).send().await {
            Ok(resp) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                ctx.log(
                    Severity::Success,
                    format!(
                        "Pinged {url} → {} ({elapsed_ms}ms, attempt {attempt})",
                        resp.status().as_u16()
                    ),
                )
                .await;
                ctx.stats().record_success(elapsed_ms);
                return true;
            }
            Err(e) => {
                ctx.log(
                    Severity::Error,
                    format!("Ping failed for {url}: {e} (attempt {attempt})"),
                )
                .await;

                if attempt < opts.retries {
                    ctx.log(
                        Severity::Info,
                        format!("Retrying {url} in {:.1}s...", opts.retry_delay.as_secs_f64()),
                    )
                    .await;
                    tokio::time::sleep(opts.retry_delay).await;
                } else {
                    ctx.log(
                        Severity::Error,
                        format!("All {} attempts failed for {url}", opts.retries),
                    )
                    .await;
                    ctx.stats().record_failure();
                }
            }
        }
    }

    false
}

/// Result of the one-shot site-status check, shaped for the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStatus {
    pub is_live: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub checked_at: DateTime<Utc>,
    #[serde(rename = "responseTime")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe the main app URL once, with no retries.
///
/// Unlike `ping_url`, "live" here requires an exact HTTP 200: a
/// reachable site returning anything else carries its status code
/// and latency but `is_live = false`.
pub async fn check_site(
    ctx: &Context,
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> SiteStatus {
    let started = Instant::now();

    match client.get(url).timeout(timeout).send().await {
        Ok(resp) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let status = resp.status().as_u16();
            let is_live = status == 200;

            let severity = if is_live { Severity::Success } else { Severity::Warning };
            ctx.log(
                severity,
                format!("Site check: {url} → {status} ({elapsed_ms}ms)"),
            )
            .await;

            SiteStatus {
                is_live,
                status: Some(status),
                checked_at: Utc::now(),
                response_time_ms: Some(elapsed_ms),
                error: None,
            }
        }
        Err(e) => {
            ctx.log(Severity::Error, format!("Site check failed for {url}: {e}"))
                .await;

            SiteStatus {
                is_live: false,
                status: None,
                checked_at: Utc::now(),
                response_time_ms: None,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlewake_core::LogEntry;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_opts() -> PingOptions {
        PingOptions {
            retries: 3,
            retry_delay: Duration::from_millis(50),
            timeout: Duration::from_secs(2),
        }
    }

    fn test_client() -> reqwest::Client {
        // No connection reuse: each attempt must dial fresh so the
        // flaky-server fixtures see every attempt.
        reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .unwrap()
    }

    fn count_matching(logs: &[LogEntry], severity: Severity, needle: &str) -> usize {
        logs.iter()
            .filter(|e| e.severity == severity && e.message.contains(needle))
            .count()
    }

    /// Bind an ephemeral port, then drop the listener so connections
    /// to it are refused.
    async fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }

    /// A server that drops the first `failures` connections without
    /// responding, then answers 200 to everything after.
    async fn flaky_server(failures: u32) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut remaining = failures;
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                if remaining > 0 {
                    remaining -= 1;
                    continue; // dropped: connection reset mid-request
                }
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let _ = stream
                    .write_all(
                        b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
                    )
                    .await;
            }
        });

        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn completed_response_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let ctx = Context::new(50);
        let ok = ping_url(&ctx, &test_client(), &server.uri(), &fast_opts()).await;

        assert!(ok);
        assert_eq!(ctx.stats().ping_count(), 1);
        assert_eq!(ctx.stats().success_count(), 1);

        let logs = ctx.recent_logs().await;
        assert_eq!(count_matching(&logs, Severity::Success, "Pinged"), 1);
    }

    #[tokio::test]
    async fn non_2xx_response_still_counts_as_success() {
        // Keep-alive pings only care that the request completed.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let ctx = Context::new(50);
        let ok = ping_url(&ctx, &test_client(), &server.uri(), &fast_opts()).await;

        assert!(ok);
        assert_eq!(ctx.stats().success_count(), 1);

        let logs = ctx.recent_logs().await;
        assert_eq!(count_matching(&logs, Severity::Success, "503"), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_log_every_attempt_and_wait_between_them() {
        let url = dead_url().await;
        let opts = fast_opts();

        let ctx = Context::new(50);
        let started = Instant::now();
        let ok = ping_url(&ctx, &test_client(), &url, &opts).await;
        let elapsed = started.elapsed();

        assert!(!ok);
        // Two inter-attempt waits for three attempts.
        assert!(elapsed >= opts.retry_delay * 2, "elapsed {elapsed:?}");

        let logs = ctx.recent_logs().await;
        assert_eq!(count_matching(&logs, Severity::Error, "Ping failed"), 3);
        assert_eq!(count_matching(&logs, Severity::Error, "All 3 attempts failed"), 1);
        assert_eq!(count_matching(&logs, Severity::Info, "Retrying"), 2);

        assert_eq!(ctx.stats().ping_count(), 1);
        assert_eq!(ctx.stats().success_count(), 0);
    }

    #[tokio::test]
    async fn recovers_when_third_attempt_succeeds() {
        let url = flaky_server(2).await;
        let opts = fast_opts();

        let ctx = Context::new(50);
        let ok = ping_url(&ctx, &test_client(), &url, &opts).await;

        assert!(ok);
        assert_eq!(ctx.stats().ping_count(), 1);
        assert_eq!(ctx.stats().success_count(), 1);

        let logs = ctx.recent_logs().await;
        assert_eq!(count_matching(&logs, Severity::Error, "Ping failed"), 2);
        assert_eq!(count_matching(&logs, Severity::Success, "Pinged"), 1);
        assert_eq!(count_matching(&logs, Severity::Error, "All 3 attempts failed"), 0);
    }

    #[tokio::test]
    async fn site_check_live_only_on_exact_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let ctx = Context::new(50);
        let status = check_site(&ctx, &test_client(), &server.uri(), Duration::from_secs(2)).await;

        assert!(status.is_live);
        assert_eq!(status.status, Some(200));
        assert!(status.response_time_ms.is_some());
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn site_check_reachable_but_not_live() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ctx = Context::new(50);
        let status = check_site(&ctx, &test_client(), &server.uri(), Duration::from_secs(2)).await;

        assert!(!status.is_live);
        assert_eq!(status.status, Some(404));
        assert!(status.response_time_ms.is_some());
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn site_check_unreachable_reports_error_without_latency() {
        let url = dead_url().await;

        let ctx = Context::new(50);
        let status = check_site(&ctx, &test_client(), &url, Duration::from_secs(2)).await;

        assert!(!status.is_live);
        assert_eq!(status.status, None);
        assert_eq!(status.response_time_ms, None);
        assert!(status.error.is_some());

        let logs = ctx.recent_logs().await;
        assert_eq!(count_matching(&logs, Severity::Error, "Site check failed"), 1);
    }

    #[tokio::test]
    async fn site_check_does_not_touch_ping_counters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let ctx = Context::new(50);
        check_site(&ctx, &test_client(), &server.uri(), Duration::from_secs(2)).await;

        assert_eq!(ctx.stats().ping_count(), 0);
    }

    #[test]
    fn site_status_serializes_api_field_names() {
        let status = SiteStatus {
            is_live: true,
            status: Some(200),
            checked_at: Utc::now(),
            response_time_ms: Some(12),
            error: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isLive"], true);
        assert_eq!(json["responseTime"], 12);
        assert!(json["checkedAt"].is_string());
        assert!(json.get("error").is_none());
    }
}
