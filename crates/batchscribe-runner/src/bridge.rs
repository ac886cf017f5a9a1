//! One-shot synchronization between the engine's terminal event and the
//! waiting batch driver
//!
//! Exactly one bridge exists per in-flight job; it is discarded after use.
//! The engine notification context is the single writer ([`set_result`] at
//! most once before the terminal event, then [`signal`] exactly once); the
//! driver is the single reader ([`await_with_timeout`], then
//! [`take_result`]). A signal or stored result arriving after the driver has
//! dropped the bridge is observed by nothing.
//!
//! [`set_result`]: CompletionBridge::set_result
//! [`signal`]: CompletionBridge::signal
//! [`await_with_timeout`]: CompletionBridge::await_with_timeout
//! [`take_result`]: CompletionBridge::take_result

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Outcome of waiting on a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeWait {
    /// The terminal event fired before the timeout
    Completed,

    /// The timeout elapsed without a terminal event
    TimedOut,
}

/// One-shot completion cell bound to a single job's execution
#[derive(Debug, Default)]
pub struct CompletionBridge {
    /// Wakes the waiting driver
    notify: Notify,

    /// Set once by the terminal event
    signaled: AtomicBool,

    /// The most recent `ResultAvailable` text for the current job
    result: Mutex<Option<String>>,
}

impl CompletionBridge {
    /// Create a fresh, unsignaled bridge
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stash the most recent raw transcript for the in-flight job
    pub fn set_result(&self, text: String) {
        *self.result.lock() = Some(text);
    }

    /// Mark the job's lifecycle as terminated. Safe to call on an
    /// already-signaled bridge, though correct engine operation never
    /// signals twice.
    pub fn signal(&self) {
        if !self.signaled.swap(true, Ordering::SeqCst) {
            self.notify.notify_one();
        }
    }

    /// Whether the terminal event has fired
    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::SeqCst)
    }

    /// Block the calling task until signaled or the duration elapses
    pub async fn await_with_timeout(&self, duration: Duration) -> BridgeWait {
        if self.is_signaled() {
            return BridgeWait::Completed;
        }

        match tokio::time::timeout(duration, self.notify.notified()).await {
            Ok(()) => BridgeWait::Completed,
            Err(_) => BridgeWait::TimedOut,
        }
    }

    /// Read the stashed transcript, exactly once, after a completed wait
    pub fn take_result(&self) -> Option<String> {
        self.result.lock().take()
    }
}
