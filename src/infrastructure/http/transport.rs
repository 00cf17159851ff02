//! reqwest-backed tracking transport.

use async_trait::async_trait;
use reqwest::header;
use url::Url;

use crate::domain::entities::TrackingResponse;
use crate::domain::ports::{Credentials, FetchOptions, TrackingTransport, TransportError};

/// Response header through which a server confirms the source origin it is
/// answering for.
const SOURCE_ORIGIN_HEADER: &str = "access-control-allow-source-origin";

/// HTTP transport for the click-tracking request.
///
/// Holds two clients: one with a cookie store for credentialed fetches and a
/// plain one for anonymous fetches.
pub struct HttpTransport {
    credentialed: reqwest::Client,
    anonymous: reqwest::Client,
}

impl HttpTransport {
    /// Builds the transport and its HTTP clients.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] when the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, TransportError> {
        let credentialed = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|error| TransportError::Client(error.to_string()))?;
        let anonymous = reqwest::Client::builder()
            .build()
            .map_err(|error| TransportError::Client(error.to_string()))?;

        Ok(Self {
            credentialed,
            anonymous,
        })
    }
}

#[async_trait]
impl TrackingTransport for HttpTransport {
    async fn fetch_json(
        &self,
        url: &Url,
        options: FetchOptions,
    ) -> Result<TrackingResponse, TransportError> {
        let client = match options.credentials {
            Credentials::Include => &self.credentialed,
            Credentials::Omit => &self.anonymous,
        };

        let response = client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| TransportError::Request {
                url: url.clone(),
                reason: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        if let Some(expected) = &options.require_source_origin {
            let confirmed = response
                .headers()
                .get(SOURCE_ORIGIN_HEADER)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value == expected);
            if !confirmed {
                return Err(TransportError::SourceOrigin {
                    url: url.clone(),
                    expected: expected.clone(),
                });
            }
        }

        response
            .json::<TrackingResponse>()
            .await
            .map_err(|error| TransportError::Body {
                url: url.clone(),
                reason: error.to_string(),
            })
    }
}
