//! Page/history bindings.
//!
//! Provides [`MemoryPage`], an in-memory [`Page`](crate::domain::ports::Page)
//! implementation for tests and headless embedders.

mod memory_page;

pub use memory_page::MemoryPage;
