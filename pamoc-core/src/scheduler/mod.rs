//! Session scheduler
//!
//! Times the phases of a breathing session and feeds elapsed-time events
//! into the guidance state machine.

pub mod session;

pub use session::BreathingSession;
