//! Configuration type definitions
//!
//! Every tunable of the device is a named constant here. The structs only
//! group those constants so components can be built and tested with
//! alternative values; the firmware always uses the defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Heart rate above which a breathing session starts (BPM, strict `>`)
pub const THRESHOLD_BPM: u16 = 120;

/// Initial amplitude threshold handed to the beat detector (10-bit counts)
///
/// The reference device feeds its BPM threshold straight into the pulse
/// library, so both default to the same number.
pub const PULSE_AMPLITUDE_THRESHOLD: u16 = 120;

/// Time to let an inbound serial message finish arriving before relaying it
pub const SERIAL_SETTLE_MS: u32 = 100;

/// Trailing delay at the end of every loop iteration
pub const LOOP_DELAY_MS: u32 = 1000;

/// Breaths per guidance session
pub const REPETITIONS: u8 = 10;

/// Inhale phase duration (motor on)
pub const INHALE_MS: u32 = 4000;

/// Hold phase duration, used after both inhale and exhale (motor off)
pub const HOLD_MS: u32 = 2000;

/// Exhale phase duration (motor on)
pub const EXHALE_MS: u32 = 4000;

/// ADC full-scale code of the reference board (10-bit)
pub const ADC_FULL_SCALE: u16 = 1023;

/// Internal analog reference of the reference board (volts)
pub const ADC_REFERENCE_V: f32 = 1.1;

/// Battery divider ratio ahead of the ADC pin
pub const BATTERY_DIVIDER_RATIO: f32 = 5.0;

/// How voltages that land exactly on a breakpoint are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BarBoundaries {
    /// Strict comparisons on both sides of every band.
    ///
    /// Exactly 0 V, 1 V and 2.35 V fall through to the full (4-bar)
    /// reading, matching the shipped device.
    #[default]
    Strict,
    /// Lower bounds inclusive: `[1, 2.35)`, `[2.35, 3.7)`.
    ///
    /// Deviates from the shipped device; opt-in only.
    Inclusive,
}

/// Whether a running breathing session may be aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionPolicy {
    /// A triggered session always runs all repetitions
    #[default]
    RunToCompletion,
    /// Cancel requests are honoured at the next phase boundary
    Cancellable,
}

/// Raw ADC code to volts conversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoltageScale {
    /// Code read at the reference voltage
    pub full_scale: u16,
    /// ADC reference voltage
    pub reference_v: f32,
    /// Multiplier undoing the external resistor divider
    pub divider_ratio: f32,
}

impl VoltageScale {
    /// Convert a raw ADC code to volts at the battery terminal
    pub fn to_volts(&self, raw: u16) -> f32 {
        if self.full_scale == 0 {
            return 0.0;
        }
        raw as f32 / self.full_scale as f32 * self.reference_v * self.divider_ratio
    }
}

impl Default for VoltageScale {
    fn default() -> Self {
        Self {
            full_scale: ADC_FULL_SCALE,
            reference_v: ADC_REFERENCE_V,
            divider_ratio: BATTERY_DIVIDER_RATIO,
        }
    }
}

/// Fixed cadence of a guidance session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreathingProtocol {
    /// Number of inhale/hold/exhale/hold repetitions
    pub repetitions: u8,
    /// Inhale duration (ms)
    pub inhale_ms: u32,
    /// Hold duration after each inhale and each exhale (ms)
    pub hold_ms: u32,
    /// Exhale duration (ms)
    pub exhale_ms: u32,
}

impl BreathingProtocol {
    /// Duration of one repetition (ms), saturating at `u32::MAX`
    pub const fn repetition_ms(&self) -> u32 {
        self.inhale_ms
            .saturating_add(self.hold_ms)
            .saturating_add(self.exhale_ms)
            .saturating_add(self.hold_ms)
    }

    /// Duration of a full session (ms), saturating at `u32::MAX`
    pub const fn session_ms(&self) -> u32 {
        self.repetition_ms().saturating_mul(self.repetitions as u32)
    }
}

impl Default for BreathingProtocol {
    fn default() -> Self {
        Self {
            repetitions: REPETITIONS,
            inhale_ms: INHALE_MS,
            hold_ms: HOLD_MS,
            exhale_ms: EXHALE_MS,
        }
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Session trigger threshold (BPM)
    pub threshold_bpm: u16,
    /// Beat detector amplitude threshold
    pub pulse_amplitude_threshold: u16,
    /// Serial settle delay (ms)
    pub serial_settle_ms: u32,
    /// Trailing loop delay (ms)
    pub loop_delay_ms: u32,
    /// Battery conversion
    pub voltage_scale: VoltageScale,
    /// Breakpoint policy for the battery gauge
    pub bar_boundaries: BarBoundaries,
    /// Session timing
    pub breathing: BreathingProtocol,
    /// Session cancellation policy
    pub session_policy: SessionPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold_bpm: THRESHOLD_BPM,
            pulse_amplitude_threshold: PULSE_AMPLITUDE_THRESHOLD,
            serial_settle_ms: SERIAL_SETTLE_MS,
            loop_delay_ms: LOOP_DELAY_MS,
            voltage_scale: VoltageScale::default(),
            bar_boundaries: BarBoundaries::default(),
            breathing: BreathingProtocol::default(),
            session_policy: SessionPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_protocol_timing() {
        let protocol = BreathingProtocol::default();
        assert_eq!(protocol.repetition_ms(), 12_000);
        assert_eq!(protocol.session_ms(), 120_000);
    }

    #[test]
    fn test_long_protocol_saturates() {
        let protocol = BreathingProtocol {
            repetitions: 10,
            inhale_ms: u32::MAX / 2,
            hold_ms: u32::MAX / 4,
            exhale_ms: u32::MAX / 2,
        };
        assert_eq!(protocol.repetition_ms(), u32::MAX);
        assert_eq!(protocol.session_ms(), u32::MAX);

        let protocol = BreathingProtocol {
            repetitions: u8::MAX,
            inhale_ms: 40_000_000,
            ..Default::default()
        };
        assert_eq!(protocol.repetition_ms(), 40_008_000);
        assert_eq!(protocol.session_ms(), u32::MAX);
    }

    #[test]
    fn test_default_scale() {
        let scale = VoltageScale::default();

        assert_eq!(scale.to_volts(0), 0.0);
        // Full scale reads reference * divider
        assert!((scale.to_volts(1023) - 5.5).abs() < 1e-4);
        // 372 counts is the 2.0 V scenario
        assert!((scale.to_volts(372) - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_full_scale_reads_zero() {
        let scale = VoltageScale {
            full_scale: 0,
            ..Default::default()
        };
        assert_eq!(scale.to_volts(500), 0.0);
    }

    #[test]
    fn test_defaults_are_reference_behavior() {
        let config = MonitorConfig::default();
        assert_eq!(config.threshold_bpm, 120);
        assert_eq!(config.serial_settle_ms, 100);
        assert_eq!(config.loop_delay_ms, 1000);
        assert_eq!(config.bar_boundaries, BarBoundaries::Strict);
        assert_eq!(config.session_policy, SessionPolicy::RunToCompletion);
    }
}
