//! Per-run shared state: pause/cancel signals and progress counters
//!
//! A `RunState` is created for each run and shared (via `Arc`) between the
//! engine worker and whoever drives it. The driver flips pause and cancel;
//! the engine updates the counters and waits while paused.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Shared state of one sorting run
#[derive(Debug, Default)]
pub struct RunState {
    paused: Mutex<bool>,
    wake: Condvar,
    cancelled: AtomicBool,
    pub total: AtomicUsize,
    pub processed: AtomicUsize,
    pub moved: AtomicUsize,
    pub skipped: AtomicUsize,
    pub failed: AtomicUsize,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    pub fn resume(&self) {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.wake.notify_all();
    }

    /// Flip the pause flag, returning the new value
    pub fn toggle_pause(&self) -> bool {
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        *paused = !*paused;
        if !*paused {
            self.wake.notify_all();
        }
        *paused
    }

    /// Request cancellation. Stays set for the rest of the run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // Take the lock so a waiter cannot miss the notification
        let _guard = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        self.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Block while paused, re-checking at least every `poll`.
    ///
    /// Returns `true` if the run was cancelled, whether or not it was paused.
    pub fn wait_while_paused(&self, poll: Duration) -> bool {
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        while *paused && !self.is_cancelled() {
            paused = self
                .wake
                .wait_timeout(paused, poll)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        self.is_cancelled()
    }

    /// Fraction of the run done, in `0.0..=1.0`. An empty run counts as done.
    pub fn progress(&self) -> f64 {
        let total = self.total.load(Ordering::Relaxed);
        let processed = self.processed.load(Ordering::Relaxed);
        if total == 0 {
            1.0
        } else {
            (processed as f64 / total as f64).min(1.0)
        }
    }

    /// Snapshot of the counters
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.total.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            moved: self.moved.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.is_cancelled(),
        }
    }
}

/// Counters at the end (or any point) of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Progress denominator (raw entry count in quick mode)
    pub total: usize,
    /// Eligible files attempted
    pub processed: usize,
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}, Processed: {}, Moved: {}, Skipped: {}, Failed: {}",
            self.total, self.processed, self.moved, self.skipped, self.failed
        )
    }
}
