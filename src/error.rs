use crate::domain::ports::{TransportError, ViewerError};

/// Failure of a single coordinator step.
///
/// Step errors never reach the session handle: the coordinator logs them and
/// the session settles normally. They exist so steps and infrastructure can
/// report precisely what went wrong before being swallowed.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error(transparent)]
    Viewer(#[from] ViewerError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid tracking url: {0}")]
    Url(#[from] url::ParseError),
}
