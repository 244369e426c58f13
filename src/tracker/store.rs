//! Per-element sample store
//!
//! Keeps the two most recent samples and the last computed speed.

use crate::capture::types::{Point, Sample};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleStore {
    current: Option<Sample>,
    previous: Option<Sample>,
    current_speed: f64,
}

impl SampleStore {
    pub fn current(&self) -> Option<&Sample> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&Sample> {
        self.previous.as_ref()
    }

    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.current_speed = speed;
    }

    /// Shift the current sample into the previous slot and store a new one
    ///
    /// A clock reading older than the current sample is clamped to the
    /// current sample's timestamp so that `previous <= current` always holds.
    pub fn record(&mut self, point: Point, now_ms: f64) -> Sample {
        let timestamp_ms = match self.current {
            Some(current) if now_ms < current.timestamp_ms => current.timestamp_ms,
            _ => now_ms,
        };
        let sample = Sample::new(point, timestamp_ms);

        if let Some(current) = self.current.take() {
            self.previous = Some(current);
        }
        self.current = Some(sample);
        sample
    }

    /// Clear both samples and zero the speed
    pub fn reset(&mut self) {
        self.current = None;
        self.previous = None;
        self.current_speed = 0.0;
    }
}
