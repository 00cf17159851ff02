#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use url::Url;

use impression_tracker::domain::entities::TrackingResponse;
use impression_tracker::domain::ports::{
    FetchOptions, PixelBeacon, TrackingTransport, TransportError,
};
use impression_tracker::infrastructure::channel::{ChannelViewer, ViewerMessage};

/// Scripted answers for the host side of the viewer channel.
#[derive(Debug, Clone)]
pub struct HostScript {
    pub trusted_viewer: bool,
    pub trusted_referrer: bool,
    pub replace_url_response: Option<Result<Option<Value>, String>>,
    /// When set, trust queries are answered with this error reason.
    pub reject_trust_queries: Option<String>,
}

impl Default for HostScript {
    fn default() -> Self {
        Self {
            trusted_viewer: true,
            trusted_referrer: false,
            replace_url_response: None,
            reject_trust_queries: None,
        }
    }
}

/// Everything the host observed while the coordinator ran.
#[derive(Debug, Default)]
pub struct HostLog {
    pub requests: Mutex<Vec<String>>,
    pub replace_urls: Mutex<Vec<Option<String>>>,
}

impl HostLog {
    pub fn request_names(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn replace_urls(&self) -> Vec<Option<String>> {
        self.replace_urls.lock().unwrap().clone()
    }
}

/// Runs a host loop answering viewer messages according to `script` until
/// the channel closes.
pub fn spawn_host(
    mut rx: mpsc::Receiver<ViewerMessage>,
    script: HostScript,
) -> (Arc<HostLog>, JoinHandle<()>) {
    let log = Arc::new(HostLog::default());
    let task_log = Arc::clone(&log);

    let handle = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            match message {
                ViewerMessage::Request(request) => {
                    task_log.requests.lock().unwrap().push(request.name.clone());
                    let reply = match request.name.as_str() {
                        "isTrustedViewer" | "isTrustedReferrer" => {
                            if let Some(reason) = &script.reject_trust_queries {
                                Err(reason.clone())
                            } else if request.name == "isTrustedViewer" {
                                Ok(Some(Value::Bool(script.trusted_viewer)))
                            } else {
                                Ok(Some(Value::Bool(script.trusted_referrer)))
                            }
                        }
                        "getReplaceUrl" => {
                            script.replace_url_response.clone().unwrap_or(Ok(None))
                        }
                        _ => Ok(None),
                    };
                    let _ = request.reply.send(reply);
                }
                ViewerMessage::ReplaceUrl(url) => {
                    task_log.replace_urls.lock().unwrap().push(url);
                }
            }
        }
    });

    (log, handle)
}

/// Builds a [`ChannelViewer`] together with its host loop and visibility
/// switch.
pub fn scripted_viewer(
    params: &[(&str, &str)],
    visible: bool,
    script: HostScript,
) -> (ChannelViewer, Arc<HostLog>, JoinHandle<()>, watch::Sender<bool>) {
    let (tx, rx) = mpsc::channel(32);
    let (visible_tx, visible_rx) = watch::channel(visible);
    let viewer = ChannelViewer::new(
        params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        tx,
        visible_rx,
    );
    let (log, handle) = spawn_host(rx, script);
    (viewer, log, handle, visible_tx)
}

/// Transport double that records every fetched URL and replays a canned
/// result.
pub struct RecordingTransport {
    pub calls: Mutex<Vec<Url>>,
    result: Mutex<Result<TrackingResponse, String>>,
}

impl RecordingTransport {
    pub fn replying(response: TrackingResponse) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result: Mutex::new(Ok(response)),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result: Mutex::new(Err(reason.to_string())),
        }
    }

    pub fn fetched_urls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrackingTransport for RecordingTransport {
    async fn fetch_json(
        &self,
        url: &Url,
        _options: FetchOptions,
    ) -> Result<TrackingResponse, TransportError> {
        self.calls.lock().unwrap().push(url.clone());
        match &*self.result.lock().unwrap() {
            Ok(response) => Ok(response.clone()),
            Err(reason) => Err(TransportError::Request {
                url: url.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Beacon double recording every fired pixel.
#[derive(Debug, Default)]
pub struct RecordingBeacon {
    pub fired: Mutex<Vec<Url>>,
}

impl RecordingBeacon {
    pub fn fired_urls(&self) -> Vec<Url> {
        self.fired.lock().unwrap().clone()
    }
}

impl PixelBeacon for RecordingBeacon {
    fn fire(&self, url: &Url) {
        self.fired.lock().unwrap().push(url.clone());
    }
}
