//! Haptic motor drivers

pub mod gpio;

pub use gpio::GpioMotor;
