//! Infrastructure layer binding the coordinator to its host environment.
//!
//! This layer implements the port traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`channel`] - Viewer bound to an in-process message channel
//! - [`http`] - reqwest-backed tracking transport and pixel beacon
//! - [`page`] - In-memory page/history binding

pub mod channel;
pub mod http;
pub mod page;
