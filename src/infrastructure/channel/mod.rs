//! Viewer messaging over an in-process channel.
//!
//! Provides [`ChannelViewer`], a [`Viewer`](crate::domain::ports::Viewer)
//! implementation that talks to the hosting shell through a
//! [`tokio::sync::mpsc`] channel with oneshot reply envelopes.

mod channel_viewer;

pub use channel_viewer::{ChannelViewer, ViewerMessage, ViewerRequest};
