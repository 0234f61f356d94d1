//! Analog sensor front ends

pub mod adc;

pub use adc::{downscale, AdcReader, ScaledAdc};
