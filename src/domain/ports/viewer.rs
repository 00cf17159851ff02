//! Messaging contract with the hosting viewer shell.

use async_trait::async_trait;
use serde_json::Value;

/// Errors surfaced by the viewer message channel.
///
/// None of these are fatal to a tracking attempt; the coordinator logs them
/// and continues with the affected step skipped.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The message channel to the viewer is gone.
    #[error("viewer channel closed")]
    ChannelClosed,

    /// The viewer answered the named request with an error.
    #[error("viewer rejected {name:?}: {reason}")]
    Rejected { name: String, reason: String },

    /// The viewer answered with a payload the protocol does not allow.
    #[error("malformed viewer response to {0:?}")]
    MalformedResponse(String),
}

/// The hosting shell embedding the document.
///
/// Parameters and capabilities are fixed at load time, so their lookups are
/// synchronous; everything crossing the message channel is asynchronous.
///
/// # Implementations
///
/// - [`crate::infrastructure::channel::ChannelViewer`] - mpsc-bound viewer
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Viewer: Send + Sync {
    /// Returns an initialization parameter supplied by the viewer at load
    /// time.
    fn param(&self, name: &str) -> Option<String>;

    /// Whether the viewer advertised the named capability.
    fn has_capability(&self, name: &str) -> bool;

    /// Sends a request message and waits for the viewer's response payload.
    ///
    /// `Ok(None)` means the viewer answered without a payload.
    async fn send_message_await_response(
        &self,
        name: &str,
        payload: Value,
    ) -> Result<Option<Value>, ViewerError>;

    /// Whether the hosting shell itself is classified as trusted.
    async fn is_trusted_viewer(&self) -> Result<bool, ViewerError>;

    /// Whether the document was reached through a trusted referrer.
    async fn is_trusted_referrer(&self) -> Result<bool, ViewerError>;

    /// Resolves once the hosting document has become visible for the first
    /// time.
    async fn when_first_visible(&self) -> Result<(), ViewerError>;

    /// Asks the viewer to swap the visible URL. Best effort, no response.
    fn replace_url(&self, url: Option<String>);
}
