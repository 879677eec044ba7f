//! Startup gate for outbound traffic
//!
//! The engine wires its transport endpoints asynchronously relative to
//! module initialization order, so other modules may issue sends and gets
//! before wiring completes. Those calls must block until the barrier opens;
//! they must not silently no-op or error.

use std::sync::{Condvar, Mutex, PoisonError};

/// Single-writer, many-reader readiness flag
///
/// False at construction, set true exactly once after transport wiring,
/// never reset. Waiters suspend on a condition variable rather than
/// busy-blocking.
pub struct ReadinessBarrier {
    ready: Mutex<bool>,
    opened: Condvar,
}

impl ReadinessBarrier {
    /// Creates a closed barrier
    pub fn new() -> Self {
        Self {
            ready: Mutex::new(false),
            opened: Condvar::new(),
        }
    }

    /// Blocks the calling thread until the barrier has opened
    pub fn wait(&self) {
        let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        while !*ready {
            ready = self
                .opened
                .wait(ready)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Opens the barrier and wakes every waiter
    ///
    /// Idempotent: calling again after the first open has no effect.
    pub fn set_ready(&self) {
        let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        *ready = true;
        drop(ready);
        self.opened.notify_all();
    }

    /// Returns whether the barrier has opened
    pub fn is_ready(&self) -> bool {
        *self.ready.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ReadinessBarrier {
    fn default() -> Self {
        Self::new()
    }
}
