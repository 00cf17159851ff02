//! Fire-and-forget tracking pixel over HTTP.

use tracing::debug;
use url::Url;

use crate::domain::ports::PixelBeacon;

/// Fires tracking pixels as detached GET requests.
///
/// The outcome is ignored; a lost pixel is indistinguishable from a fired
/// one as far as the protocol is concerned. Must be used from within a Tokio
/// runtime.
pub struct HttpPixelBeacon {
    client: reqwest::Client,
}

impl HttpPixelBeacon {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl PixelBeacon for HttpPixelBeacon {
    fn fire(&self, url: &Url) {
        let client = self.client.clone();
        let url = url.clone();
        tokio::spawn(async move {
            match client.get(url.clone()).send().await {
                Ok(response) => {
                    debug!(url = %url, status = response.status().as_u16(), "tracking pixel fired");
                }
                Err(error) => {
                    debug!(url = %url, error = %error, "tracking pixel dropped");
                }
            }
        });
    }
}
