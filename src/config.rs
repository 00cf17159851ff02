//! Runtime configuration loaded from environment variables.
//!
//! Configuration is loaded once by the embedder and handed to the coordinator;
//! nothing is re-read at runtime.
//!
//! ## Optional Variables
//!
//! - `IMPRESSION_TIMEOUT_MS` - Upper bound for one tracking attempt (default: 8000)
//! - `PROXY_ORIGINS` - Comma-separated trusted serving origins excluded from
//!   tracking-pixel firing (default: none)
//! - `DEV_CLICK_PROXY` - Local proxy endpoint that click requests are routed
//!   through during development (default: unset)
//! - `TEST_MODE` - Set by test harnesses; suppresses the dev-proxy rewrite
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `EXPERIMENT_LINK_ATTRIBUTION` - Treats the context as trusted without
//!   viewer trust signals (default: off)

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Default upper bound for one tracking attempt.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_millis(8_000);

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for one tracking attempt. Expiry settles the session
    /// without aborting in-flight work.
    pub session_timeout: Duration,
    /// Trusted internal serving origins; tracking pixels are never fired at
    /// these.
    pub proxy_origins: Vec<Url>,
    /// Local proxy endpoint that click requests are routed through during
    /// development. `None` in production.
    pub dev_proxy_url: Option<Url>,
    /// Set by test harnesses; suppresses the dev-proxy rewrite.
    pub test_mode: bool,
    pub log_level: String,
    pub log_format: String,
    pub experiments: Experiments,
}

/// Experiment toggles consulted synchronously by the coordinator.
#[derive(Debug, Clone, Default)]
pub struct Experiments {
    /// Runs the handshake even when neither viewer trust signal is present.
    pub link_attribution: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            proxy_origins: Vec::new(),
            dev_proxy_url: None,
            test_mode: false,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            experiments: Experiments::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `PROXY_ORIGINS` or `DEV_CLICK_PROXY` contain
    /// unparseable URLs.
    pub fn from_env() -> Result<Self> {
        let session_timeout = env::var("IMPRESSION_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SESSION_TIMEOUT);

        let proxy_origins = match env::var("PROXY_ORIGINS") {
            Ok(raw) => Self::parse_origins(&raw)?,
            Err(_) => Vec::new(),
        };

        let dev_proxy_url = env::var("DEV_CLICK_PROXY")
            .ok()
            .map(|raw| Url::parse(&raw).context("DEV_CLICK_PROXY must be a valid URL"))
            .transpose()?;

        let test_mode = env::var("TEST_MODE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let link_attribution = env::var("EXPERIMENT_LINK_ATTRIBUTION")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            session_timeout,
            proxy_origins,
            dev_proxy_url,
            test_mode,
            log_level,
            log_format,
            experiments: Experiments { link_attribution },
        })
    }

    fn parse_origins(raw: &str) -> Result<Vec<Url>> {
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                Url::parse(origin).with_context(|| format!("invalid proxy origin {origin:?}"))
            })
            .collect()
    }
}
