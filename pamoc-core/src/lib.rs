//! Board-agnostic core logic for the P.A.Mo.C. pulse monitor firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (display, sensors, serial, actuator)
//! - Battery gauge and pulse edge detection
//! - Breathing guidance state machine and session scheduler
//! - The main control loop as a cooperative step machine
//! - Configuration constants and types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod battery;
pub mod config;
pub mod error;
pub mod monitor;
pub mod pulse;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use error::DeviceError;
pub use monitor::{run_blocking, Device, Monitor, MonitorEvent, Tick};
