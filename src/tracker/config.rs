//! Tracker configuration
//!
//! [`TrackerOptions`] is what callers pass to `init`; every field is optional
//! and is merged over [`TrackerConfig::default`] into the config stored with
//! each tracked element. Defaults are never mutated.

use crate::capture::types::ElementId;
use crate::error::TrackerResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default speed poll cadence in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 20;

/// Default delay before the sampler re-arms, in milliseconds
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 15;

/// Invoked on every poll tick with the element and its speed (distance/ms)
pub type SpeedCallback = Arc<dyn Fn(ElementId, f64) + Send + Sync>;

/// Resolved per-element configuration
#[derive(Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    pub sample_interval: Duration,
    pub on_speed_update: Option<SpeedCallback>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            sample_interval: Duration::from_millis(DEFAULT_SAMPLE_INTERVAL_MS),
            on_speed_update: None,
        }
    }
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("poll_interval", &self.poll_interval)
            .field("sample_interval", &self.sample_interval)
            .field("on_speed_update", &self.on_speed_update.is_some())
            .finish()
    }
}

/// Caller-supplied options, all optional
///
/// Deserializes from a camelCase JSON object. The older option names
/// `updateSpeedRate`, `speedPollingRate` and `captureMouseMoveRate` are
/// accepted as aliases.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerOptions {
    #[serde(
        default,
        alias = "updateSpeedRate",
        alias = "speedPollingRate",
        skip_serializing_if = "Option::is_none"
    )]
    pub poll_interval_ms: Option<u64>,

    #[serde(
        default,
        alias = "captureMouseMoveRate",
        skip_serializing_if = "Option::is_none"
    )]
    pub sample_interval_ms: Option<u64>,

    #[serde(skip)]
    pub on_speed_update: Option<SpeedCallback>,
}

impl TrackerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON value. `null` yields empty options.
    pub fn from_json(value: &serde_json::Value) -> TrackerResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }

    pub fn with_sample_interval_ms(mut self, ms: u64) -> Self {
        self.sample_interval_ms = Some(ms);
        self
    }

    pub fn on_speed_update<F>(mut self, callback: F) -> Self
    where
        F: Fn(ElementId, f64) + Send + Sync + 'static,
    {
        self.on_speed_update = Some(Arc::new(callback));
        self
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merged_with(&self, other: &TrackerOptions) -> TrackerOptions {
        TrackerOptions {
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            sample_interval_ms: other.sample_interval_ms.or(self.sample_interval_ms),
            on_speed_update: other
                .on_speed_update
                .clone()
                .or_else(|| self.on_speed_update.clone()),
        }
    }

    /// Merge over the defaults. Zero intervals become 1 ms.
    pub fn resolve(&self) -> TrackerConfig {
        let defaults = TrackerConfig::default();
        TrackerConfig {
            poll_interval: self
                .poll_interval_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or(defaults.poll_interval),
            sample_interval: self
                .sample_interval_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or(defaults.sample_interval),
            on_speed_update: self.on_speed_update.clone(),
        }
    }
}

impl fmt::Debug for TrackerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerOptions")
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("sample_interval_ms", &self.sample_interval_ms)
            .field("on_speed_update", &self.on_speed_update.is_some())
            .finish()
    }
}
