//! Highlight state and change notification.
//!
//! At most one relation name is highlighted at a time.  The state is owned
//! by the network instance (not a global) and serialized through a `Mutex`,
//! so a multi-threaded host never observes a torn value.  Each change bumps
//! a revision counter the renderer can poll; the owning network forwards
//! every update to its [`HighlightObserver`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Receives the style-recomputation signal.
///
/// The renderer implements this to schedule a redraw of the trail layer;
/// nothing about geometry changes.
pub trait HighlightObserver: Send + Sync {
    /// Called after every highlight update, with the revision current at
    /// that point.
    fn on_highlight_changed(&self, _highlighted: Option<&str>, _revision: u64) {}
}

/// A [`HighlightObserver`] that does nothing.
pub struct NoopHighlightObserver;

impl HighlightObserver for NoopHighlightObserver {}

// ── HighlightState ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HighlightState {
    current: Mutex<Option<String>>,
    revision: AtomicU64,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // Poisoning is ignored: the guarded value is always a whole `Option<String>`.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the highlighted name.  Returns `true` if it changed; the
    /// revision only advances on change.
    pub fn set(&self, name: Option<String>) -> bool {
        let mut current = self.lock();
        if *current == name {
            return false;
        }
        debug!(from = ?*current, to = ?name, "highlight changed");
        *current = name;
        self.revision.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// A copy of the highlighted name.
    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Run `f` against the current name without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(Option<&str>) -> R) -> R {
        let current = self.lock();
        f(current.as_deref())
    }

    /// Number of changes so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}
