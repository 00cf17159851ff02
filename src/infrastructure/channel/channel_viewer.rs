//! Viewer bound to an in-process message channel.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

use crate::domain::ports::{Viewer, ViewerError};

/// Viewer parameter listing the capabilities the host advertises,
/// comma-separated.
const CAPABILITIES_PARAM: &str = "cap";
/// Message name of the trusted-viewer query.
const TRUSTED_VIEWER_MESSAGE: &str = "isTrustedViewer";
/// Message name of the trusted-referrer query.
const TRUSTED_REFERRER_MESSAGE: &str = "isTrustedReferrer";

/// A request message sent to the hosting shell.
///
/// The host answers through `reply`; dropping the sender without answering
/// reads as a closed channel on the document side.
#[derive(Debug)]
pub struct ViewerRequest {
    pub name: String,
    pub payload: Value,
    pub reply: oneshot::Sender<Result<Option<Value>, String>>,
}

/// Message envelope traveling from the document to the hosting shell.
#[derive(Debug)]
pub enum ViewerMessage {
    /// Request/response round trip.
    Request(ViewerRequest),
    /// One-way visible-URL swap.
    ReplaceUrl(Option<String>),
}

/// [`Viewer`] implementation over an in-process message channel.
///
/// Parameters are handed over once at construction; the capability set is
/// parsed from the comma-separated `cap` parameter. Visibility arrives
/// through a watch channel the host flips when the document is first shown.
pub struct ChannelViewer {
    params: HashMap<String, String>,
    capabilities: HashSet<String>,
    messages: mpsc::Sender<ViewerMessage>,
    first_visible: watch::Receiver<bool>,
}

impl ChannelViewer {
    /// Binds a viewer to its message channel.
    pub fn new(
        params: HashMap<String, String>,
        messages: mpsc::Sender<ViewerMessage>,
        first_visible: watch::Receiver<bool>,
    ) -> Self {
        let capabilities = params
            .get(CAPABILITIES_PARAM)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|cap| !cap.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            params,
            capabilities,
            messages,
            first_visible,
        }
    }

    async fn request(&self, name: &str, payload: Value) -> Result<Option<Value>, ViewerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = ViewerRequest {
            name: name.to_string(),
            payload,
            reply: reply_tx,
        };

        self.messages
            .send(ViewerMessage::Request(request))
            .await
            .map_err(|_| ViewerError::ChannelClosed)?;

        match reply_rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(reason)) => Err(ViewerError::Rejected {
                name: name.to_string(),
                reason,
            }),
            Err(_) => Err(ViewerError::ChannelClosed),
        }
    }

    async fn request_bool(&self, name: &str) -> Result<bool, ViewerError> {
        match self.request(name, Value::Null).await? {
            Some(Value::Bool(answer)) => Ok(answer),
            _ => Err(ViewerError::MalformedResponse(name.to_string())),
        }
    }
}

#[async_trait]
impl Viewer for ChannelViewer {
    fn param(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }

    fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    async fn send_message_await_response(
        &self,
        name: &str,
        payload: Value,
    ) -> Result<Option<Value>, ViewerError> {
        self.request(name, payload).await
    }

    async fn is_trusted_viewer(&self) -> Result<bool, ViewerError> {
        self.request_bool(TRUSTED_VIEWER_MESSAGE).await
    }

    async fn is_trusted_referrer(&self) -> Result<bool, ViewerError> {
        self.request_bool(TRUSTED_REFERRER_MESSAGE).await
    }

    async fn when_first_visible(&self) -> Result<(), ViewerError> {
        let mut first_visible = self.first_visible.clone();
        first_visible
            .wait_for(|visible| *visible)
            .await
            .map(|_| ())
            .map_err(|_| ViewerError::ChannelClosed)
    }

    fn replace_url(&self, url: Option<String>) {
        if let Err(error) = self.messages.try_send(ViewerMessage::ReplaceUrl(url)) {
            warn!(error = %error, "replaceUrl command dropped");
        }
    }
}
