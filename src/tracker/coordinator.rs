//! Lifecycle controller
//!
//! Creates and discards per-element state, wires entry/exit notifications to
//! the poller and sampler, and answers speed queries.

use crate::capture::types::{ElementId, Point, Sample};
use crate::error::{TrackerError, TrackerResult};
use crate::host::{Clock, Scheduler, TimerEvent, TimerKind};
use crate::tracker::config::TrackerOptions;
use crate::tracker::state::TrackerState;
use std::collections::HashMap;

/// Pointer speed tracker over a set of host elements
#[derive(Debug)]
pub struct Cursometer<S: Scheduler, C: Clock> {
    scheduler: S,
    clock: C,
    trackers: HashMap<ElementId, TrackerState>,
}

impl<S: Scheduler, C: Clock> Cursometer<S, C> {
    pub fn new(scheduler: S, clock: C) -> Self {
        Self {
            scheduler,
            clock,
            trackers: HashMap::new(),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_initialized(&self, element: ElementId) -> bool {
        self.trackers.contains_key(&element)
    }

    pub fn state(&self, element: ElementId) -> Option<&TrackerState> {
        self.trackers.get(&element)
    }

    pub fn tracked_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.trackers.keys().copied()
    }

    /// Register each element with `options` merged over the defaults
    ///
    /// Sampling is armed immediately so a position is captured even before
    /// the pointer enters. An element that is already registered is torn
    /// down first. Returns the same element collection.
    pub fn initialize(&mut self, elements: &[ElementId], options: &TrackerOptions) -> Vec<ElementId> {
        for &element in elements {
            if let Some(previous) = self.trackers.remove(&element) {
                tracing::debug!("{} re-initialized, discarding previous registration", element);
                self.discard(previous);
            }

            let mut state = TrackerState::new(options.resolve());
            state.sampler.arm();

            tracing::info!(
                "{} initialized (poll_interval={:?}, sample_interval={:?})",
                element,
                state.config.poll_interval,
                state.config.sample_interval
            );
            self.trackers.insert(element, state);
        }
        elements.to_vec()
    }

    /// Speed computed at the element's most recent poll tick
    pub fn get_current_speed(&self, element: ElementId) -> TrackerResult<f64> {
        self.trackers
            .get(&element)
            .map(TrackerState::current_speed)
            .ok_or(TrackerError::NotInitialized(element))
    }

    /// Pointer entered the element: arm sampling and start polling
    ///
    /// Entering while the poll loop is already running does not start a
    /// second loop.
    pub fn pointer_enter(&mut self, element: ElementId) -> TrackerResult<()> {
        let state = self
            .trackers
            .get_mut(&element)
            .ok_or(TrackerError::NotInitialized(element))?;

        state.sampler.arm();
        if state.poller.is_active() {
            tracing::trace!("{} entered while already polling", element);
            return Ok(());
        }

        tracing::debug!("{} entered, polling started", element);
        state
            .poller
            .tick(element, &mut state.store, &state.config, &mut self.scheduler);
        Ok(())
    }

    /// Pointer left the element: stop both loops and reset readings
    pub fn pointer_leave(&mut self, element: ElementId) -> TrackerResult<()> {
        let state = self
            .trackers
            .get_mut(&element)
            .ok_or(TrackerError::NotInitialized(element))?;

        state.store.reset();
        state.sampler.stop(&mut self.scheduler);
        state.poller.stop(&mut self.scheduler);

        tracing::debug!("{} left, polling stopped", element);
        Ok(())
    }

    /// Pointer moved over the element
    ///
    /// Returns the captured sample, or `None` if the sampler was not armed.
    pub fn pointer_move(&mut self, element: ElementId, point: Point) -> TrackerResult<Option<Sample>> {
        let now_ms = self.clock.now_ms();
        let state = self
            .trackers
            .get_mut(&element)
            .ok_or(TrackerError::NotInitialized(element))?;

        Ok(state.sampler.capture(
            element,
            &mut state.store,
            point,
            now_ms,
            state.config.sample_interval,
            &mut self.scheduler,
        ))
    }

    /// Route a fired timer to its loop
    pub fn on_timer(&mut self, event: TimerEvent) {
        let Some(state) = self.trackers.get_mut(&event.element) else {
            tracing::trace!("dropping timer for unregistered {}", event.element);
            return;
        };

        match event.kind {
            TimerKind::Poll => {
                state.poller.on_timer(
                    event.generation,
                    event.element,
                    &mut state.store,
                    &state.config,
                    &mut self.scheduler,
                );
            }
            TimerKind::SamplerRearm => {
                if state.sampler.on_rearm(event.generation) {
                    tracing::trace!("{} sampler re-armed", event.element);
                }
            }
        }
    }

    /// Cancel both loops and drop the element's state
    pub fn teardown(&mut self, element: ElementId) -> TrackerResult<()> {
        let state = self
            .trackers
            .remove(&element)
            .ok_or(TrackerError::NotInitialized(element))?;
        self.discard(state);
        tracing::info!("{} torn down", element);
        Ok(())
    }

    /// Tear down every registered element
    pub fn teardown_all(&mut self) {
        let elements: Vec<ElementId> = self.tracked_elements().collect();
        for element in elements {
            if let Some(state) = self.trackers.remove(&element) {
                self.discard(state);
            }
        }
    }

    fn discard(&mut self, mut state: TrackerState) {
        state.sampler.stop(&mut self.scheduler);
        state.poller.stop(&mut self.scheduler);
    }
}
