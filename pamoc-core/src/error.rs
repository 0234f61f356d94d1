//! Monitor-level error type

use crate::traits::{DisplayError, SensorError, SerialError};

/// Errors surfaced by the control loop
///
/// Each variant names the collaborator that failed and carries its
/// driver-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Display write failed
    Display(DisplayError),
    /// Battery ADC read failed
    Battery(SensorError),
    /// Beat detector unavailable
    Pulse(SensorError),
    /// Serial write failed
    Serial(SerialError),
}

impl From<DisplayError> for DeviceError {
    fn from(e: DisplayError) -> Self {
        DeviceError::Display(e)
    }
}

impl From<SerialError> for DeviceError {
    fn from(e: SerialError) -> Self {
        DeviceError::Serial(e)
    }
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::Display(e) => write!(f, "display: {:?}", e),
            DeviceError::Battery(e) => write!(f, "battery: {:?}", e),
            DeviceError::Pulse(e) => write!(f, "pulse: {:?}", e),
            DeviceError::Serial(e) => write!(f, "serial: {:?}", e),
        }
    }
}
