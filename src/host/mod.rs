//! Host collaborator interfaces
//!
//! The tracker never reads a clock or sets a timer directly. The embedding
//! host supplies both through these traits and routes fired timers back into
//! [`Cursometer::on_timer`](crate::tracker::Cursometer::on_timer).

pub mod manual;

use crate::capture::types::ElementId;
use std::time::Duration;

pub use manual::{ManualClock, ManualScheduler};

/// Wall-clock source in milliseconds since the Unix epoch
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Deferred callback primitives provided by the host
pub trait Scheduler {
    /// Deliver `event` back to the tracker after `delay`
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle;

    /// Cancel a scheduled event. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Which loop a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Next speed poller tick
    Poll,
    /// Position sampler re-arm
    SamplerRearm,
}

/// Payload handed back to the tracker when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerEvent {
    pub element: ElementId,
    pub kind: TimerKind,
    /// Loop generation at scheduling time; stale generations are no-ops
    pub generation: u64,
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1000.0
    }
}

pub(crate) fn duration_ms(delay: Duration) -> f64 {
    delay.as_micros() as f64 / 1000.0
}
