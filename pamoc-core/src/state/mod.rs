//! Breathing guidance state machine
//!
//! Defines when the motor runs and what the display instructs.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::GuidanceEvent;
pub use machine::{BreathingCycle, GuidanceState, Phase};
