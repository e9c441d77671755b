//! Navigable location port trait.

/// Access to the shared location (browser URL bar or an equivalent).
///
/// `read` returns `None` when no navigable context exists; every consumer
/// treats that as a no-op, not an error.
pub trait LocationPort {
    /// Current full URL, if a navigable context exists.
    fn read(&self) -> Option<String>;

    /// Replace the current URL in place, without adding a history entry.
    fn replace(&self, url: &str);
}
