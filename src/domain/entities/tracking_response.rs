//! Ad-server response to a click-tracking request.

use serde::Deserialize;

/// Body returned by the ad server for a click-tracking request.
///
/// Both fields are optional; an empty object is a valid answer. The response
/// is applied once and not retained.
///
/// - `location` - Landing URL whose query parameters are merged onto the
///   current page URL
/// - `tracking_url` - Preferred target for the one-way tracking pixel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingResponse {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
}

impl TrackingResponse {
    /// Target for the tracking pixel: `tracking_url` when present, otherwise
    /// `location`.
    pub fn track_url(&self) -> Option<&str> {
        self.tracking_url.as_deref().or(self.location.as_deref())
    }
}
