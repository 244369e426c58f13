//! Cursometer - pointer speed tracking over sampled cursor positions.
//!
//! A position sampler captures one pointer move at a time and re-arms itself
//! after a short delay; a speed poller turns the two most recent samples into
//! a distance-per-millisecond reading on a fixed cadence and reports it via a
//! callback. The host supplies the clock, the timers and the pointer
//! notifications through the traits in [`host`].

pub mod capture;
pub mod commands;
pub mod error;
pub mod host;
pub mod processing;
pub mod runtime;
pub mod tracker;

pub use capture::{ElementId, Point, Sample};
pub use commands::{Command, CommandOutput, Invocation};
pub use error::{TrackerError, TrackerResult};
pub use host::{Clock, ManualClock, ManualScheduler, Scheduler, SystemClock, TimerEvent, TimerHandle, TimerKind};
pub use processing::{compute_speed, distance};
pub use runtime::{TrackerHandle, TrackerRuntime};
pub use tracker::{Cursometer, TrackerConfig, TrackerOptions};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber
///
/// Honours `RUST_LOG`, falling back to `cursometer=debug`. Calling this more
/// than once leaves the first subscriber in place.
pub fn init_tracing() {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cursometer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if installed.is_ok() {
        tracing::info!("Starting cursometer v{}", env!("CARGO_PKG_VERSION"));
    }
}
