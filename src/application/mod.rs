//! Application layer orchestrating the impression handshake.
//!
//! This layer coordinates port calls, validation and the session lifecycle.
//! It consumes the domain port traits and exposes a single entry point for
//! embedders.
//!
//! # Available Services
//!
//! - [`services::impression_service::ImpressionService`] - The impression
//!   coordinator

pub mod services;
