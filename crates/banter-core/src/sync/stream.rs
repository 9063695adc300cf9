//! Per-stream in-flight accounting.
//!
//! Each synchronization stream (conversation list, active window,
//! previews, notifications) allows at most one outstanding request. A
//! tick that fires while one is in flight is skipped outright, never
//! queued, so a slow backend cannot build a backlog.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Result of driving one tick of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Response fetched and applied; count of newly added records.
    Merged(usize),
    /// Another request was already in flight; no call was issued.
    Skipped,
    /// Response arrived after the owning context changed and was
    /// discarded on generation mismatch.
    Stale,
    /// Stream has nothing to poll (no active conversation).
    Idle,
}

/// Check-and-set guard for the one-request-per-stream invariant.
///
/// The runtime has no preemption between `try_begin` and the await
/// that follows it, so this flag (not a lock) is the entire
/// concurrency control for a stream.
#[derive(Debug, Default)]
pub struct TickGate {
    in_flight: AtomicBool,
    skipped: AtomicU64,
}

impl TickGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the stream for one request. Returns false (and counts a
    /// skip) when a request is already outstanding.
    pub fn try_begin(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            true
        } else {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Release the stream after the response was applied or discarded.
    pub fn finish(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn skipped_ticks(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// RAII wrapper so early returns in a tick cannot leave the gate held.
pub struct TickPermit<'a>(&'a TickGate);

impl TickGate {
    pub fn acquire(&self) -> Option<TickPermit<'_>> {
        if self.try_begin() {
            Some(TickPermit(self))
        } else {
            None
        }
    }
}

impl Drop for TickPermit<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}
