use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::services::session::UserScoped;

/// Identifies one load of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewToken(u64);

/// Holds the latest result of a view and discards results from loads that
/// were superseded or torn down before they finished.
pub struct ScopedView<T> {
    generation: AtomicU64,
    current: Mutex<Option<T>>,
}

impl<T: Clone> Default for ScopedView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ScopedView<T> {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Starts a load; every earlier token becomes stale.
    pub fn begin(&self) -> ViewToken {
        ViewToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: ViewToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }

    /// Stores `value` if `token` is still current. Returns whether it was kept.
    pub fn apply(&self, token: ViewToken, value: T) -> bool {
        let mut current = self.current.lock().unwrap();
        if !self.is_current(token) {
            return false;
        }
        *current = Some(value);
        true
    }

    pub fn latest(&self) -> Option<T> {
        self.current.lock().unwrap().clone()
    }

    /// Closes the view: pending loads are dropped when they resolve.
    pub fn teardown(&self) {
        let mut current = self.current.lock().unwrap();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *current = None;
    }
}

impl<T: Clone + Send> UserScoped for ScopedView<T> {
    fn reset(&self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_load_supersedes_older() {
        let view = ScopedView::new();
        let first = view.begin();
        let second = view.begin();

        assert!(!view.apply(first, "stale"));
        assert!(view.apply(second, "fresh"));
        assert_eq!(view.latest(), Some("fresh"));
    }

    #[test]
    fn test_teardown_discards_in_flight_result() {
        let view = ScopedView::new();
        view.apply(view.begin(), 1);

        let pending = view.begin();
        view.teardown();
        assert!(!view.is_current(pending));
        assert!(!view.apply(pending, 2));
        assert_eq!(view.latest(), None);
    }
}
