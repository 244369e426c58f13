//! Tokio-backed clock and scheduler
//!
//! Each scheduled timer is a spawned sleep that posts a `TimerFired` request
//! back into the actor queue. Cancelling aborts the sleep; the poller and
//! sampler generations cover a fire that was already queued.

use crate::host::{Clock, Scheduler, TimerEvent, TimerHandle};
use crate::runtime::Request;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Wall clock that advances with tokio time
///
/// Anchored to the Unix time at construction and advanced by
/// `tokio::time::Instant`, so it follows a paused test clock.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    base_unix_ms: f64,
    base_instant: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            base_unix_ms: chrono::Utc::now().timestamp_millis() as f64,
            base_instant: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> f64 {
        let elapsed = Instant::now().duration_since(self.base_instant);
        self.base_unix_ms + elapsed.as_micros() as f64 / 1000.0
    }
}

#[derive(Debug)]
pub struct TokioScheduler {
    requests: WeakUnboundedSender<Request>,
    next_id: u64,
    timers: HashMap<TimerHandle, AbortHandle>,
}

impl TokioScheduler {
    pub(crate) fn new(requests: WeakUnboundedSender<Request>) -> Self {
        Self {
            requests,
            next_id: 0,
            timers: HashMap::new(),
        }
    }

    /// Number of sleeps still outstanding
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Forget a timer whose fire has been received
    pub(crate) fn complete(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }

    pub(crate) fn abort_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let requests = self.requests.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(requests) = requests.upgrade() {
                let _ = requests.send(Request::TimerFired { handle, event });
            }
        });

        self.timers.insert(handle, task.abort_handle());
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(timer) = self.timers.remove(&handle) {
            timer.abort();
        }
    }
}
