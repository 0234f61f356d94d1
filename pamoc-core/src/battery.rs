//! Battery voltage sampler
//!
//! Reads the divided battery voltage and maps it onto a 0-4 bar gauge.

use crate::config::{BarBoundaries, VoltageScale, BATTERY_BAR_CELLS};
use crate::traits::{AnalogInput, Cell, SensorError};

/// Maximum number of battery bars
pub const MAX_BARS: u8 = 4;

/// Lower edge of the 2-bar band (volts)
pub const TWO_BAR_V: f32 = 1.0;

/// Lower edge of the 3-bar band (volts)
pub const THREE_BAR_V: f32 = 2.35;

/// Lower edge of the full reading (volts)
pub const FULL_V: f32 = 3.7;

/// Battery gauge reading in [0, 4]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BarCount(u8);

impl BarCount {
    /// Create a bar count, saturating at [`MAX_BARS`]
    pub const fn new(bars: u8) -> Self {
        if bars > MAX_BARS {
            Self(MAX_BARS)
        } else {
            Self(bars)
        }
    }

    /// Number of bars
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Cells to draw for this reading, right to left
    pub fn cells(self) -> &'static [Cell] {
        &BATTERY_BAR_CELLS[..self.0 as usize]
    }
}

/// Map a battery voltage to a bar count
///
/// With [`BarBoundaries::Strict`] every band is open on both ends, so a
/// voltage sitting exactly on 0, 1 or 2.35 V reads as full.
pub fn bars_for_voltage(volts: f32, boundaries: BarBoundaries) -> BarCount {
    let bars = match boundaries {
        BarBoundaries::Strict => {
            if volts > 0.0 && volts < TWO_BAR_V {
                1
            } else if volts > TWO_BAR_V && volts < THREE_BAR_V {
                2
            } else if volts > THREE_BAR_V && volts < FULL_V {
                3
            } else {
                4
            }
        }
        BarBoundaries::Inclusive => {
            if volts > 0.0 && volts < TWO_BAR_V {
                1
            } else if (TWO_BAR_V..THREE_BAR_V).contains(&volts) {
                2
            } else if (THREE_BAR_V..FULL_V).contains(&volts) {
                3
            } else {
                4
            }
        }
    };
    BarCount::new(bars)
}

/// One battery sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    /// Raw ADC code
    pub raw: u16,
    /// Battery voltage after undoing the divider
    pub volts: f32,
    /// Gauge reading
    pub bars: BarCount,
}

/// Voltage sampler over an analog input
pub struct VoltageSampler<ADC> {
    adc: ADC,
    scale: VoltageScale,
    boundaries: BarBoundaries,
}

impl<ADC> VoltageSampler<ADC> {
    /// Create a sampler
    pub fn new(adc: ADC, scale: VoltageScale, boundaries: BarBoundaries) -> Self {
        Self {
            adc,
            scale,
            boundaries,
        }
    }

    /// Convert a raw code without touching the ADC
    pub fn convert(&self, raw: u16) -> BatteryReading {
        let volts = self.scale.to_volts(raw);
        BatteryReading {
            raw,
            volts,
            bars: bars_for_voltage(volts, self.boundaries),
        }
    }
}

impl<ADC: AnalogInput> VoltageSampler<ADC> {
    /// Read the ADC and classify the result
    pub fn sample(&mut self) -> Result<BatteryReading, SensorError> {
        let raw = self.adc.read_raw()?;
        Ok(self.convert(raw))
    }
}
