//! Binding to the visible URL and history of the hosting environment.

use url::Url;

/// The embedded document's visible URL and its history entry.
///
/// History is only ever replaced, never pushed; the stack depth observed by
/// the user does not change.
#[cfg_attr(test, mockall::automock)]
pub trait Page: Send + Sync {
    /// Current visible URL of the document.
    fn current_url(&self) -> Url;

    /// Drops the `#fragment` from the visible URL, if any.
    fn clear_fragment(&self);

    /// Whether the environment can replace the current history entry.
    fn supports_history_replace(&self) -> bool;

    /// Replaces the current history entry with `url` without growing the
    /// history stack.
    fn replace_history(&self, url: &Url);
}
