//! Observer trait for coordinator events.
//!
//! Inject an [`Arc<dyn SessionObserver>`] via
//! [`crate::coordinator::Coordinator::with_observer`] to be told whenever the
//! view state changes or a transient notice is raised. This is the hook a
//! front end uses to re-render: a terminal spinner, an HTML page refresh, a
//! log line.
//!
//! # Example
//!
//! ```rust
//! use docview::{SessionObserver, ViewState};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     renders: AtomicUsize,
//! }
//!
//! impl SessionObserver for CountingObserver {
//!     fn on_state_changed(&self, _state: &ViewState) {
//!         self.renders.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let observer = Arc::new(CountingObserver { renders: AtomicUsize::new(0) });
//! let _as_dyn: Arc<dyn SessionObserver> = observer;
//! ```

use crate::state::ViewState;
use std::sync::Arc;

/// Called by the coordinator as a session evolves.
///
/// All methods have default no-op implementations so implementors only
/// override what they care about.
pub trait SessionObserver: Send + Sync {
    /// Called after every state transition that changed the state.
    fn on_state_changed(&self, state: &ViewState) {
        let _ = state;
    }

    /// Called when a selection is turned away or ignored.
    ///
    /// Notices are transient and are never part of [`ViewState`].
    fn on_notice(&self, message: &str) {
        let _ = message;
    }

    /// Called when a file becomes the pending selection.
    ///
    /// # Arguments
    /// * `name` — file name as selected
    /// * `size` — size in bytes
    fn on_selection(&self, name: &str, size: u64) {
        let _ = (name, size);
    }
}

/// A no-op implementation for callers that don't need events.
///
/// This is the default when no observer is configured.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Convenience alias for the type stored in the coordinator.
pub type Observer = Arc<dyn SessionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TrackingObserver {
        changes: AtomicUsize,
        notices: Mutex<Vec<String>>,
        selections: AtomicUsize,
    }

    impl SessionObserver for TrackingObserver {
        fn on_state_changed(&self, _state: &ViewState) {
            self.changes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_notice(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_string());
        }

        fn on_selection(&self, _name: &str, _size: u64) {
            self.selections.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        obs.on_state_changed(&ViewState::default());
        obs.on_notice("nothing");
        obs.on_selection("a.pdf", 10);
    }

    #[test]
    fn tracking_observer_receives_events() {
        let tracker = TrackingObserver {
            changes: AtomicUsize::new(0),
            notices: Mutex::new(Vec::new()),
            selections: AtomicUsize::new(0),
        };

        tracker.on_selection("a.pdf", 10);
        tracker.on_state_changed(&ViewState::default());
        tracker.on_state_changed(&ViewState::default());
        tracker.on_notice("too large");

        assert_eq!(tracker.selections.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.changes.load(Ordering::SeqCst), 2);
        assert_eq!(*tracker.notices.lock().unwrap(), vec!["too large".to_string()]);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: Observer = Arc::new(NoopObserver);
        obs.on_state_changed(&ViewState::default());
    }
}
