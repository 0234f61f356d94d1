//! Pulse sensor signal processing

pub mod detector;

pub use detector::BeatDetector;
