//! GPIO vibration motor
//!
//! Switches a coin vibration motor through a transistor on one GPIO pin.

use pamoc_core::traits::Actuator;

use crate::gpio::OutputPin;

/// GPIO motor output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioMotor<P> {
    pin: P,
    /// If true, motor ON = pin LOW
    inverted: bool,
    /// Current logical state (true = vibrating)
    on: bool,
}

impl<P: OutputPin> GpioMotor<P> {
    /// Create a new GPIO motor output
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the transistor
    /// - `inverted`: If true, the motor runs while the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut motor = Self {
            pin,
            inverted,
            on: false,
        };
        // Ensure motor starts off
        motor.drive(false);
        motor
    }

    /// Create a motor switched by an NPN low-side transistor
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a motor switched by a PNP high-side transistor
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    fn drive(&mut self, on: bool) {
        self.on = on;
        // Pin level is the logical state flipped for active-low wiring
        self.pin.set_level(on != self.inverted);
    }
}

impl<P: OutputPin> Actuator for GpioMotor<P> {
    fn set_on(&mut self, on: bool) {
        self.drive(on);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::mock::MockPin;

    #[test]
    fn test_active_high_motor() {
        let mut motor = GpioMotor::new_active_high(MockPin { high: true });

        // Initially off
        assert!(!motor.is_on());
        assert!(!motor.pin.is_set_high());

        motor.set_on(true);
        assert!(motor.is_on());
        assert!(motor.pin.is_set_high());

        motor.set_on(false);
        assert!(!motor.is_on());
        assert!(!motor.pin.is_set_high());
    }

    #[test]
    fn test_active_low_motor() {
        let mut motor = GpioMotor::new_active_low(MockPin::default());

        // Initially off (pin is high for active-low)
        assert!(!motor.is_on());
        assert!(motor.pin.is_set_high());

        motor.set_on(true);
        assert!(motor.is_on());
        assert!(!motor.pin.is_set_high());
    }

    #[test]
    fn test_actuator_trait() {
        fn pulse<A: Actuator>(a: &mut A) {
            assert!(!a.is_on());
            a.set_on(true);
            assert!(a.is_on());
        }

        let mut motor = GpioMotor::new_active_high(MockPin::default());
        pulse(&mut motor);
    }
}
