//! Impression-tracking coordination service.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::domain::entities::TrackingResponse;
use crate::domain::ports::{FetchOptions, Page, PixelBeacon, TrackingTransport, Viewer};
use crate::domain::session::{SessionSettler, SessionSlot, TrackingSession};
use crate::error::TrackingError;
use crate::utils::origin::is_proxy_origin;
use crate::utils::url_rewrite::{merge_location_params, to_dev_proxy};

/// Viewer parameter carrying the URL to swap in for the visible location.
const REPLACE_URL_PARAM: &str = "replaceUrl";
/// Viewer capability guarding the asynchronous replace-URL round trip.
const REPLACE_URL_CAPABILITY: &str = "replaceUrl";
/// Message name of the asynchronous replace-URL request.
const GET_REPLACE_URL_MESSAGE: &str = "getReplaceUrl";
/// Viewer parameter carrying the click-tracking URL.
const CLICK_PARAM: &str = "click";
/// The only scheme accepted for click-tracking URLs.
const CLICK_SCHEME_PREFIX: &str = "https://";

/// Coordinates the one-time impression handshake with the hosting viewer.
///
/// One tracking attempt runs four steps: a trust check, the replace-URL
/// resolution, the click-tracking request, and the application of the ad
/// server's response. The attempt settles its [`TrackingSession`] on
/// completion, on skip, and on timeout alike; no collaborator failure ever
/// surfaces through the session.
///
/// The viewer protocol guarantees that the `replaceUrl` and `click`
/// parameters never arrive together. The coordinator relies on that without
/// checking it and joins both steps concurrently regardless.
pub struct ImpressionService<V: Viewer, T: TrackingTransport, B: PixelBeacon, P: Page> {
    viewer: Arc<V>,
    transport: Arc<T>,
    beacon: Arc<B>,
    page: Arc<P>,
    config: Config,
}

impl<V, T, B, P> ImpressionService<V, T, B, P>
where
    V: Viewer + 'static,
    T: TrackingTransport + 'static,
    B: PixelBeacon + 'static,
    P: Page + 'static,
{
    /// Creates a new impression service.
    pub fn new(
        viewer: Arc<V>,
        transport: Arc<T>,
        beacon: Arc<B>,
        page: Arc<P>,
        config: Config,
    ) -> Self {
        Self {
            viewer,
            transport,
            beacon,
            page,
            config,
        }
    }

    /// Starts a tracking attempt.
    ///
    /// The session is installed into `slot` before this method returns, so a
    /// concurrent `slot.current()` reader can never race an unset slot. The
    /// returned session settles when the attempt finishes, is skipped, or
    /// runs into the session timeout; it never fails.
    pub fn start(self: &Arc<Self>, slot: &mut SessionSlot) -> TrackingSession {
        let (settler, session) = TrackingSession::new();
        slot.install(session.clone());

        let service = Arc::clone(self);
        tokio::spawn(async move { service.run(settler).await });

        session
    }

    async fn run(self: Arc<Self>, settler: SessionSettler) {
        let service = Arc::clone(&self);
        let steps = tokio::spawn(async move { service.run_steps().await });

        // The timeout races the join handle, not the work itself: in-flight
        // viewer and network calls keep running, their late settlement simply
        // has no observer.
        match timeout(self.config.session_timeout, steps).await {
            Ok(Ok(())) => {}
            Ok(Err(join_error)) => {
                warn!(error = %join_error, "impression tracking task failed");
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.session_timeout.as_millis() as u64,
                    "impression tracking timed out"
                );
            }
        }
        settler.settle();
    }

    async fn run_steps(&self) {
        if !self.in_trusted_context().await {
            debug!("untrusted context, impression tracking skipped");
            return;
        }

        let (_, click) = tokio::join!(self.apply_replace_url(), self.track_click());
        if let Err(error) = click {
            warn!(error = %error, "click tracking failed");
        }
    }

    /// Trust gate: untrusted contexts never receive URL rewriting.
    async fn in_trusted_context(&self) -> bool {
        let (viewer, referrer) = tokio::join!(
            self.viewer.is_trusted_viewer(),
            self.viewer.is_trusted_referrer()
        );
        let viewer = viewer.unwrap_or_else(|error| {
            warn!(error = %error, "trusted-viewer query failed");
            false
        });
        let referrer = referrer.unwrap_or_else(|error| {
            warn!(error = %error, "trusted-referrer query failed");
            false
        });
        viewer || referrer || self.config.experiments.link_attribution
    }

    /// Resolves the visible-URL replacement.
    ///
    /// Does not wait for document visibility: the replacement canonicalizes
    /// the URL rather than reporting engagement. Failures are logged and
    /// swallowed here, never propagated.
    async fn apply_replace_url(&self) {
        let Some(param) = self.viewer.param(REPLACE_URL_PARAM) else {
            return;
        };

        if !self.viewer.has_capability(REPLACE_URL_CAPABILITY) {
            // Legacy viewers hand the replacement over directly.
            self.viewer.replace_url(Some(param));
            return;
        }

        match self
            .viewer
            .send_message_await_response(GET_REPLACE_URL_MESSAGE, json!({}))
            .await
        {
            Ok(Some(Value::Object(response))) => {
                let url = response
                    .get(REPLACE_URL_PARAM)
                    .and_then(Value::as_str)
                    .map(str::to_string);
                self.viewer.replace_url(url);
            }
            Ok(response) => {
                warn!(?response, "malformed getReplaceUrl response");
            }
            Err(error) => {
                warn!(error = %error, "getReplaceUrl request failed");
            }
        }
    }

    /// Runs the click-tracking request once the document is visible.
    ///
    /// Transport failures propagate to the caller, which swallows them after
    /// logging; nothing reaches the session.
    async fn track_click(&self) -> Result<(), TrackingError> {
        let Some(click) = self.viewer.param(CLICK_PARAM) else {
            return Ok(());
        };

        if !click.starts_with(CLICK_SCHEME_PREFIX) {
            warn!(url = %click, "click url is not https, dropped");
            return Ok(());
        }

        // A stale fragment would re-trigger tracking on the next load.
        if self.page.current_url().fragment().is_some() {
            self.page.clear_fragment();
        }

        self.viewer.when_first_visible().await?;

        let request_url = self.request_url(&click)?;
        let response = self
            .transport
            .fetch_json(&request_url, FetchOptions::credentialed())
            .await?;
        self.apply_response(&response);
        Ok(())
    }

    /// Final request target; local development routes through the click
    /// proxy.
    fn request_url(&self, click_url: &str) -> Result<Url, TrackingError> {
        if let Some(proxy) = self
            .config
            .dev_proxy_url
            .as_ref()
            .filter(|_| !self.config.test_mode)
        {
            return Ok(to_dev_proxy(proxy, click_url));
        }
        Ok(Url::parse(click_url)?)
    }

    /// Applies the ad server's response: fires the tracking pixel and
    /// replaces the page's history entry.
    fn apply_response(&self, response: &TrackingResponse) {
        if let Some(track_url) = response.track_url() {
            if !is_proxy_origin(track_url, &self.config.proxy_origins) {
                match Url::parse(track_url) {
                    Ok(url) => self.beacon.fire(&url),
                    Err(error) => {
                        warn!(url = %track_url, error = %error, "unusable tracking pixel url");
                    }
                }
            }
        }

        let Some(location) = response.location.as_deref() else {
            return;
        };
        if !self.page.supports_history_replace() {
            return;
        }
        match merge_location_params(&self.page.current_url(), location) {
            Ok(merged) => self.page.replace_history(&merged),
            Err(error) => {
                warn!(location = %location, error = %error, "unusable tracking response location");
            }
        }
    }
}
