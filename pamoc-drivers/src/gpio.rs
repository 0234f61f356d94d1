//! GPIO output abstraction
//!
//! Drivers in this crate talk to pins through [`OutputPin`] so they can be
//! tested with plain mock pins. [`HalPin`] lifts any infallible
//! `embedded-hal` output into it.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin as HalOutputPin;

/// Trait for GPIO pin abstraction
pub trait OutputPin {
    /// Set the pin high
    fn set_high(&mut self);

    /// Set the pin low
    fn set_low(&mut self);

    /// Check if the pin is set high
    fn is_set_high(&self) -> bool;

    /// Drive the pin to a level
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Adapter for `embedded-hal` 1.0 output pins
///
/// Restricted to pins whose error type is `Infallible`, which covers
/// on-chip GPIO on the RP2040 and most other MCUs.
pub struct HalPin<P> {
    pin: P,
    high: bool,
}

impl<P: HalOutputPin<Error = Infallible>> HalPin<P> {
    /// Wrap a pin, driving it low
    pub fn new(pin: P) -> Self {
        let mut wrapped = Self { pin, high: true };
        wrapped.set_low();
        wrapped
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: HalOutputPin<Error = Infallible>> OutputPin for HalPin<P> {
    fn set_high(&mut self) {
        match self.pin.set_high() {
            Ok(()) => self.high = true,
            Err(never) => match never {},
        }
    }

    fn set_low(&mut self) {
        match self.pin.set_low() {
            Ok(()) => self.high = false,
            Err(never) => match never {},
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::OutputPin;

    /// Mock GPIO pin for testing
    #[derive(Debug, Default)]
    pub struct MockPin {
        pub high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    /// `embedded-hal` pin counting level changes
    #[derive(Default)]
    struct CountingPin {
        high: bool,
        writes: u32,
    }

    impl ErrorType for CountingPin {
        type Error = Infallible;
    }

    impl HalOutputPin for CountingPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_hal_pin_starts_low() {
        let pin = HalPin::new(CountingPin {
            high: true,
            writes: 0,
        });
        assert!(!pin.is_set_high());

        let inner = pin.into_inner();
        assert!(!inner.high);
        assert_eq!(inner.writes, 1);
    }

    #[test]
    fn test_hal_pin_tracks_level() {
        let mut pin = HalPin::new(CountingPin::default());

        pin.set_level(true);
        assert!(pin.is_set_high());
        pin.set_level(false);
        assert!(!pin.is_set_high());

        assert_eq!(pin.into_inner().writes, 3);
    }
}
