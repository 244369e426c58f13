//! Per-element tracking
//!
//! The [`Cursometer`] owns one [`TrackerState`] per registered element and
//! routes host notifications and fired timers to the sampler and poller.

pub mod config;
pub mod coordinator;
pub mod state;
pub mod store;

pub use config::{SpeedCallback, TrackerConfig, TrackerOptions};
pub use coordinator::Cursometer;
pub use state::TrackerState;
pub use store::SampleStore;
