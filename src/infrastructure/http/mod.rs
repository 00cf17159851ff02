//! reqwest-backed network adapters.
//!
//! - [`HttpTransport`] - Credentialed JSON fetch for the click request
//! - [`HttpPixelBeacon`] - Fire-and-forget tracking pixel

mod pixel_beacon;
mod transport;

pub use pixel_beacon::HttpPixelBeacon;
pub use transport::HttpTransport;
