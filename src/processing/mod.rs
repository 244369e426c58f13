//! Speed processing
//!
//! Distance math over captured points and the self-rescheduling poller that
//! turns the two most recent samples into a speed reading.

pub mod geometry;
pub mod speed;

pub use geometry::distance;
pub use speed::{compute_speed, SpeedPoller};
