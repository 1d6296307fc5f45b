//! Configuration — environment variables with hardcoded defaults.
//!
//! All knobs come from the environment; every one has a default so
//! the daemon runs out of the box. Validation happens once at startup
//! and is fatal on failure — no partial startup.

use crate::error::{ConfigError, ConfigResult};

/// Default listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

const DEFAULT_RANDOM_URLS: &[&str] = &[
    "https://your-app.onrender.com/",
    "https://your-app.onrender.com/about",
    "https://your-app.onrender.com/api/health",
];

const DEFAULT_DEDICATED_URL: &str = "https://your-app.onrender.com/priority";

const DEFAULT_MAIN_APP_URL: &str = "https://your-app.onrender.com/";

/// Runtime configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL set the random loop draws from.
    pub random_urls: Vec<String>,
    /// Single URL pinged on the fixed 10-minute cadence.
    pub dedicated_url: String,
    /// Explicit self-ping URL; when absent the daemon derives
    /// `http://localhost:<port>` after the listener binds.
    pub self_url: Option<String>,
    /// URL checked on demand by `GET /api/site-status`.
    pub main_app_url: String,
    /// Listen port for the HTTP API.
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment, filling in defaults.
    ///
    /// Recognized variables: `IDLEWAKE_RANDOM_URLS` (comma-separated),
    /// `IDLEWAKE_DEDICATED_URL`, `IDLEWAKE_SELF_URL`,
    /// `IDLEWAKE_MAIN_URL`, `PORT`.
    pub fn from_env() -> ConfigResult<Self> {
        let random_urls = match std::env::var("IDLEWAKE_RANDOM_URLS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => DEFAULT_RANDOM_URLS.iter().map(|s| s.to_string()).collect(),
        };

        let dedicated_url = std::env::var("IDLEWAKE_DEDICATED_URL")
            .unwrap_or_else(|_| DEFAULT_DEDICATED_URL.to_string());

        let self_url = std::env::var("IDLEWAKE_SELF_URL").ok();

        let main_app_url = std::env::var("IDLEWAKE_MAIN_URL")
            .unwrap_or_else(|_| DEFAULT_MAIN_APP_URL.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            random_urls,
            dedicated_url,
            self_url,
            main_app_url,
            port,
        })
    }

    /// Validate every ping target before any network request happens.
    ///
    /// Checks the random set and the dedicated URL for an HTTP scheme
    /// prefix. The self URL is validated separately once it is derived.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.random_urls.is_empty() {
            return Err(ConfigError::EmptyRandomSet);
        }
        for url in self.random_urls.iter().chain(std::iter::once(&self.dedicated_url)) {
            validate_url(url)?;
        }
        Ok(())
    }
}

/// Check that a URL carries an HTTP scheme prefix.
pub fn validate_url(url: &str) -> ConfigResult<()> {
    if url.starts_with("http") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl(url.to_string()))
    }
}
