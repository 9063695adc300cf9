//! Interval loops driving the synchronization streams.
//!
//! One task per stream. The first tick fires immediately on spawn,
//! then at the fixed period. A tick's error is logged here and
//! swallowed; the stream keeps its cadence regardless, so persistent
//! backend failure shows up as absence of updates, never as an
//! exception in calling code. Only the user-initiated send path
//! reports errors upward, and it does not go through this scheduler.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::error::SyncError;
use crate::sync::stream::TickOutcome;

#[derive(Default)]
pub struct SyncScheduler {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl SyncScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a recurring fetch-and-merge loop. `tick` runs to
    /// completion before the next interval fire is honored, so a slow
    /// response delays (never stacks) subsequent ticks.
    pub fn spawn_stream<F, Fut>(&mut self, name: &'static str, period: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<TickOutcome, SyncError>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match tick().await {
                    Ok(TickOutcome::Merged(added)) if added > 0 => {
                        trace!(stream = name, added, "tick merged");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        debug!(stream = name, error = %err, "tick failed, retrying on next interval");
                    }
                }
            }
        });
        self.tasks.push((name, handle));
    }

    /// Cancel every stream's timer. In-flight futures are dropped;
    /// state owners rely on generations, not on this, for correctness.
    pub fn shutdown(&mut self) {
        for (name, handle) in self.tasks.drain(..) {
            trace!(stream = name, "stopping stream");
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
