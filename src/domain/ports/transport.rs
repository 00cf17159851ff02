//! Outbound HTTP contract for the click-tracking request.

use crate::domain::entities::TrackingResponse;
use async_trait::async_trait;
use url::Url;

/// Cookie behavior for a tracking fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    /// Send cookies with the request. The click-tracking fetch always does.
    Include,
    /// Plain anonymous request.
    Omit,
}

/// Options for a JSON fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub credentials: Credentials,
    /// When set, the response must carry a matching
    /// `access-control-allow-source-origin` header. The click-tracking fetch
    /// leaves this unset: the ad server is an arbitrary external origin, not
    /// bound to the document's trusted serving origin.
    pub require_source_origin: Option<String>,
}

impl FetchOptions {
    /// Options used for the click-tracking request.
    pub fn credentialed() -> Self {
        Self {
            credentials: Credentials::Include,
            require_source_origin: None,
        }
    }
}

/// Errors from the tracking transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("request to {url} failed: {reason}")]
    Request { url: Url, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: Url, status: u16 },

    #[error("undecodable body from {url}: {reason}")]
    Body { url: Url, reason: String },

    #[error("{url} did not confirm source origin {expected:?}")]
    SourceOrigin { url: Url, expected: String },
}

/// JSON-over-HTTP transport for the tracking request.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpTransport`] - reqwest-backed transport
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingTransport: Send + Sync {
    /// Issues the tracking request and decodes the JSON body.
    async fn fetch_json(
        &self,
        url: &Url,
        options: FetchOptions,
    ) -> Result<TrackingResponse, TransportError>;
}
