//! One-way tracking pixel contract.

use url::Url;

/// Fire-and-forget tracking pixel.
///
/// Implementations must not block and must swallow every failure; the
/// protocol never observes the outcome of a pixel.
#[cfg_attr(test, mockall::automock)]
pub trait PixelBeacon: Send + Sync {
    fn fire(&self, url: &Url);
}
