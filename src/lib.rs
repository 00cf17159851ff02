//! # Impression Tracker
//!
//! Coordinates the one-time impression-tracking handshake between an embedded
//! document and the viewer shell hosting it: resolving a visible-URL
//! replacement, forwarding a click-tracking request to an ad server, and
//! rewriting the page location from the server's response.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Session primitives, the tracking-response
//!   entity, and the collaborator port traits
//! - **Application Layer** ([`application`]) - The impression coordinator
//!   orchestrating the handshake steps
//! - **Infrastructure Layer** ([`infrastructure`]) - Channel-bound viewer,
//!   HTTP transport/beacon, and in-memory page bindings
//!
//! ## Behavior
//!
//! - Untrusted contexts never receive URL rewriting
//! - Click tracking waits for first document visibility; URL replacement does not
//! - Every collaborator failure is logged and swallowed; the session handle
//!   always settles, bounded by a configurable timeout
//! - History entries are replaced, never pushed
//!
//! ## Quick Start
//!
//! ```ignore
//! let config = Config::from_env()?;
//! telemetry::init(&config);
//!
//! let service = Arc::new(ImpressionService::new(
//!     viewer, transport, beacon, page, config,
//! ));
//!
//! let mut slot = SessionSlot::new();
//! service.start(&mut slot);
//!
//! // Anywhere else in the page lifecycle:
//! slot.current().settled().await;
//! ```
//!
//! ## Configuration
//!
//! Runtime settings are loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub mod config;
pub mod telemetry;

pub use config::Config;
pub use error::TrackingError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for embedders
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::ImpressionService;
    pub use crate::config::{Config, Experiments};
    pub use crate::domain::entities::TrackingResponse;
    pub use crate::domain::ports::{Page, PixelBeacon, TrackingTransport, Viewer};
    pub use crate::domain::session::{SessionSlot, TrackingSession};
    pub use crate::error::TrackingError;
}
