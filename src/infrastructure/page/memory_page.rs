//! In-memory page binding.

use std::sync::Mutex;

use url::Url;

use crate::domain::ports::Page;

/// Page binding holding the visible URL in memory.
///
/// Stands in for a real browser binding in tests and headless embedders.
/// History replacement overwrites the held URL in place; nothing is ever
/// pushed.
#[derive(Debug)]
pub struct MemoryPage {
    url: Mutex<Url>,
    supports_replace: bool,
}

impl MemoryPage {
    pub fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
            supports_replace: true,
        }
    }

    /// Page whose environment cannot replace history entries.
    pub fn without_history_replace(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
            supports_replace: false,
        }
    }
}

impl Page for MemoryPage {
    fn current_url(&self) -> Url {
        self.url.lock().expect("page url lock poisoned").clone()
    }

    fn clear_fragment(&self) {
        self.url
            .lock()
            .expect("page url lock poisoned")
            .set_fragment(None);
    }

    fn supports_history_replace(&self) -> bool {
        self.supports_replace
    }

    fn replace_history(&self, url: &Url) {
        *self.url.lock().expect("page url lock poisoned") = url.clone();
    }
}
