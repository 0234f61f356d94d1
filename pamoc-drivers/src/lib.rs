//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pamoc-core for the monitor's peripherals:
//!
//! - Character LCD (HD44780, 4-bit parallel)
//! - Haptic motor (GPIO transistor switch)
//! - Pulse sensor beat detection
//! - ADC resolution scaling for the battery gauge

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod haptic;
pub mod lcd;
pub mod pulse;
pub mod sensor;
