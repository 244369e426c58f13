//! Pointer position capture
//!
//! Holds the captured value types and the one-shot position sampler that
//! feeds the per-element sample store.

pub mod sampler;
pub mod types;

pub use sampler::{PositionSampler, SamplerState};
pub use types::{ElementId, Point, Sample};
