//! Error types for tracker operations

use crate::capture::types::ElementId;
use thiserror::Error;

/// Errors reported by the tracker's command surface
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Element queried or notified before `init`
    #[error("{0} has not been initialized")]
    NotInitialized(ElementId),

    /// Unrecognized command name
    #[error("Method {0} does not exist on cursometer")]
    UnknownMethod(String),

    /// Query issued against an empty element collection
    #[error("No elements selected")]
    EmptySelection,

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Recorded move event without a position
    #[error("Move event at {time_ms} ms has no coordinates")]
    MissingCoordinates { time_ms: f64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The async runtime has shut down
    #[error("Tracker runtime is closed")]
    RuntimeClosed,
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
