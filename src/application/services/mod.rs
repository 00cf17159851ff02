//! Coordination services for the application layer.

pub mod impression_service;

pub use impression_service::ImpressionService;
