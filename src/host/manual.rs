//! Manually driven clock and scheduler
//!
//! Used by frame-driven hosts and by trace replay: time only moves when the
//! host calls [`Cursometer::advance_to`].

use crate::host::{duration_ms, Clock, Scheduler, TimerEvent, TimerHandle};
use crate::tracker::Cursometer;
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;
use std::time::Duration;

/// Settable clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<ParkingMutex<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Arc::new(ParkingMutex::new(start_ms)),
        }
    }

    /// Move the clock to `now_ms`. Earlier readings are ignored.
    pub fn set(&self, now_ms: f64) {
        let mut current = self.now_ms.lock();
        if now_ms > *current {
            *current = now_ms;
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now_ms.lock()
    }
}

#[derive(Debug)]
struct PendingTimer {
    handle: TimerHandle,
    due_ms: f64,
    event: TimerEvent,
}

/// Timer queue keyed on a [`ManualClock`]
#[derive(Debug)]
pub struct ManualScheduler {
    clock: ManualClock,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Number of timers not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        self.pending.iter().map(|t| t.due_ms).min_by(f64::total_cmp)
    }

    /// Remove and return the earliest timer due at or before `until_ms`
    ///
    /// Timers with equal due times come out in scheduling order.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(f64, TimerEvent)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then(a.handle.cmp(&b.handle))
            })
            .map(|(i, _)| i)?;

        let timer = self.pending.remove(index);
        Some((timer.due_ms, timer.event))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            due_ms: self.clock.now_ms() + duration_ms(delay),
            event,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|t| t.handle != handle);
    }
}

impl Cursometer<ManualScheduler, ManualClock> {
    /// Tracker driven by a manual clock starting at `start_ms`
    pub fn manual(start_ms: f64) -> Self {
        let clock = ManualClock::new(start_ms);
        Cursometer::new(ManualScheduler::new(clock.clone()), clock)
    }

    /// Fire every timer due up to `now_ms`, then leave the clock at `now_ms`
    ///
    /// The clock is moved to each timer's due time before it fires, so timers
    /// scheduled from inside a firing are honoured within the same call.
    /// Returns the number of timers fired.
    pub fn advance_to(&mut self, now_ms: f64) -> usize {
        let mut fired = 0;
        while let Some((due_ms, event)) = self.scheduler_mut().pop_due(now_ms) {
            self.clock().set(due_ms);
            self.on_timer(event);
            fired += 1;
        }
        self.clock().set(now_ms);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::ElementId;
    use crate::host::TimerKind;

    fn event(generation: u64) -> TimerEvent {
        TimerEvent {
            element: ElementId(7),
            kind: TimerKind::Poll,
            generation,
        }
    }

    #[test]
    fn test_clock_clones_share_reading() {
        let clock = ManualClock::new(5.0);
        let other = clock.clone();
        other.set(15.0);
        assert_eq!(clock.now_ms(), 15.0);

        clock.set(3.0);
        assert_eq!(other.now_ms(), 15.0);
    }

    #[test]
    fn test_pop_due_orders_by_time_then_schedule_order() {
        let clock = ManualClock::new(0.0);
        let mut scheduler = ManualScheduler::new(clock);
        scheduler.schedule(Duration::from_millis(20), event(0));
        scheduler.schedule(Duration::from_millis(10), event(1));
        scheduler.schedule(Duration::from_millis(10), event(2));

        assert_eq!(scheduler.pop_due(5.0), None);
        assert_eq!(scheduler.pop_due(30.0), Some((10.0, event(1))));
        assert_eq!(scheduler.pop_due(30.0), Some((10.0, event(2))));
        assert_eq!(scheduler.pop_due(30.0), Some((20.0, event(0))));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_removes_timer() {
        let mut scheduler = ManualScheduler::new(ManualClock::new(0.0));
        let handle = scheduler.schedule(Duration::from_millis(10), event(0));
        scheduler.cancel(handle);
        scheduler.cancel(handle);

        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.next_due_ms(), None);
    }
}
