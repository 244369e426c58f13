//! Speed poller
//!
//! On each tick the poller derives speed from the two most recent samples,
//! stores it, notifies the configured callback, and schedules the next tick.

use crate::capture::types::{ElementId, Sample};
use crate::host::{Scheduler, TimerEvent, TimerHandle, TimerKind};
use crate::processing::geometry::distance;
use crate::tracker::config::TrackerConfig;
use crate::tracker::store::SampleStore;

/// Speed in distance units per millisecond
///
/// Missing samples give 0. Zero or negative elapsed time also gives 0.
pub fn compute_speed(current: Option<&Sample>, previous: Option<&Sample>) -> f64 {
    let (Some(current), Some(previous)) = (current, previous) else {
        return 0.0;
    };

    let elapsed_ms = current.timestamp_ms - previous.timestamp_ms;
    if elapsed_ms <= 0.0 {
        return 0.0;
    }

    distance(Some(&current.point), Some(&previous.point)) / elapsed_ms
}

#[derive(Debug, Default)]
pub struct SpeedPoller {
    pending_tick: Option<TimerHandle>,
    generation: u64,
}

impl SpeedPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a next tick is scheduled
    pub fn is_active(&self) -> bool {
        self.pending_tick.is_some()
    }

    /// Compute, publish and reschedule. Returns the computed speed.
    pub fn tick<S: Scheduler>(
        &mut self,
        element: ElementId,
        store: &mut SampleStore,
        config: &TrackerConfig,
        scheduler: &mut S,
    ) -> f64 {
        let speed = compute_speed(store.current(), store.previous());
        store.set_speed(speed);

        tracing::trace!("{} speed={}", element, speed);

        if let Some(callback) = &config.on_speed_update {
            callback(element, speed);
        }

        let event = TimerEvent {
            element,
            kind: TimerKind::Poll,
            generation: self.generation,
        };
        self.pending_tick = Some(scheduler.schedule(config.poll_interval, event));
        speed
    }

    /// Handle a fired tick timer. Stale generations return `None`.
    pub fn on_timer<S: Scheduler>(
        &mut self,
        generation: u64,
        element: ElementId,
        store: &mut SampleStore,
        config: &TrackerConfig,
        scheduler: &mut S,
    ) -> Option<f64> {
        if generation != self.generation || self.pending_tick.is_none() {
            return None;
        }
        self.pending_tick = None;
        Some(self.tick(element, store, config, scheduler))
    }

    /// Cancel the pending tick; any in-flight fire becomes a no-op
    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.generation += 1;
        if let Some(handle) = self.pending_tick.take() {
            scheduler.cancel(handle);
        }
    }
}
