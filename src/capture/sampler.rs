//! One-shot position sampler
//!
//! The sampler waits for a single pointer-move notification, records it into
//! the sample store, and then schedules its own re-arm after the configured
//! sample interval. Moves delivered while it is idle are dropped.

use crate::capture::types::{ElementId, Point, Sample};
use crate::host::{Scheduler, TimerEvent, TimerHandle, TimerKind};
use crate::tracker::store::SampleStore;
use std::time::Duration;

/// Whether the sampler is waiting for a pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerState {
    #[default]
    Idle,
    Armed,
}

#[derive(Debug, Default)]
pub struct PositionSampler {
    state: SamplerState,
    pending_rearm: Option<TimerHandle>,
    generation: u64,
}

impl PositionSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == SamplerState::Armed
    }

    pub fn has_pending_rearm(&self) -> bool {
        self.pending_rearm.is_some()
    }

    /// Wait for the next pointer move
    ///
    /// Returns `false` if already armed, or if a re-arm is still pending; the
    /// pending re-arm arms the sampler once the sample interval has passed.
    pub fn arm(&mut self) -> bool {
        if self.is_armed() || self.pending_rearm.is_some() {
            return false;
        }
        self.state = SamplerState::Armed;
        true
    }

    /// Record a pointer move if the sampler is armed
    ///
    /// The current sample is shifted into the previous slot, the new sample
    /// becomes current, and a re-arm is scheduled `sample_interval` later.
    pub fn capture<S: Scheduler>(
        &mut self,
        element: ElementId,
        store: &mut SampleStore,
        point: Point,
        now_ms: f64,
        sample_interval: Duration,
        scheduler: &mut S,
    ) -> Option<Sample> {
        if !self.is_armed() {
            return None;
        }

        let sample = store.record(point, now_ms);
        self.state = SamplerState::Idle;

        let event = TimerEvent {
            element,
            kind: TimerKind::SamplerRearm,
            generation: self.generation,
        };
        let handle = scheduler.schedule(sample_interval, event);
        if let Some(stale) = self.pending_rearm.replace(handle) {
            scheduler.cancel(stale);
        }

        tracing::trace!(
            "{} captured ({}, {}) at {}",
            element,
            sample.point.x,
            sample.point.y,
            sample.timestamp_ms
        );
        Some(sample)
    }

    /// Handle a fired re-arm timer. Stale generations are ignored.
    pub fn on_rearm(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.pending_rearm.is_none() {
            return false;
        }
        self.pending_rearm = None;
        self.arm();
        true
    }

    /// Disarm and cancel any scheduled re-arm
    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.state = SamplerState::Idle;
        self.generation += 1;
        if let Some(handle) = self.pending_rearm.take() {
            scheduler.cancel(handle);
        }
    }
}
