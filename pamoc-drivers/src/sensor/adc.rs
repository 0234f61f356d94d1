//! ADC channel scaling
//!
//! The monitor's voltage math is written against 10-bit codes. Wider
//! converters (the RP2040 reads 12 bits) are shifted down to that width.

use pamoc_core::traits::{AnalogInput, SensorError};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read the raw code at the converter's native resolution
    fn read(&mut self) -> Result<u16, SensorError>;
}

/// Shift a code from `from_bits` to `to_bits` of resolution
///
/// Widening is not supported; codes are returned unchanged when
/// `to_bits >= from_bits`.
pub const fn downscale(raw: u16, from_bits: u8, to_bits: u8) -> u16 {
    if to_bits >= from_bits {
        raw
    } else {
        raw >> (from_bits - to_bits)
    }
}

/// ADC channel presented at a lower resolution
pub struct ScaledAdc<ADC> {
    adc: ADC,
    native_bits: u8,
    output_bits: u8,
}

impl<ADC> ScaledAdc<ADC> {
    /// Wrap a channel
    ///
    /// # Arguments
    /// - `adc`: The channel to read
    /// - `native_bits`: Resolution of the converter (12 on the RP2040)
    /// - `output_bits`: Resolution handed to the core (10)
    pub fn new(adc: ADC, native_bits: u8, output_bits: u8) -> Self {
        Self {
            adc,
            native_bits,
            output_bits,
        }
    }
}

impl<ADC: AdcReader> AnalogInput for ScaledAdc<ADC> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let raw = self.adc.read()?;
        Ok(downscale(raw, self.native_bits, self.output_bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FixedAdc(Result<u16, SensorError>);

    impl AdcReader for FixedAdc {
        fn read(&mut self) -> Result<u16, SensorError> {
            self.0
        }
    }

    #[test]
    fn test_twelve_to_ten_bits() {
        assert_eq!(downscale(4095, 12, 10), 1023);
        assert_eq!(downscale(2048, 12, 10), 512);
        assert_eq!(downscale(3, 12, 10), 0);
    }

    #[test]
    fn test_no_widening() {
        assert_eq!(downscale(700, 10, 12), 700);
        assert_eq!(downscale(700, 10, 10), 700);
    }

    #[test]
    fn test_scaled_channel() {
        let mut adc = ScaledAdc::new(FixedAdc(Ok(1488)), 12, 10);
        assert_eq!(adc.read_raw(), Ok(372));

        let mut failing = ScaledAdc::new(FixedAdc(Err(SensorError::ConversionError)), 12, 10);
        assert_eq!(failing.read_raw(), Err(SensorError::ConversionError));
    }

    proptest! {
        #[test]
        fn prop_downscale_stays_in_range(raw in 0u16..4096) {
            prop_assert!(downscale(raw, 12, 10) <= 1023);
        }
    }
}
