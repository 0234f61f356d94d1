//! Haptic actuator trait

/// Binary on/off actuator (the vibration motor)
///
/// Implementations switch the motor transistor via GPIO. Switching is
/// assumed to always succeed.
pub trait Actuator {
    /// Switch the actuator on or off
    fn set_on(&mut self, on: bool);

    /// Check if the actuator is currently on
    fn is_on(&self) -> bool;
}
