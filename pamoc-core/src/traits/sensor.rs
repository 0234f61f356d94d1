//! Analog input and beat detection traits

/// Errors that can occur while reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    ConversionError,
    /// Sensor data unavailable (e.g. sampler not running)
    Unavailable,
}

/// Single analog channel returning raw ADC codes
pub trait AnalogInput {
    /// Read the current raw code
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Snapshot of a beat detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeatStatus {
    /// Latest rate estimate; 0 until a rate is known
    pub beats_per_minute: u16,
    /// Number of beat starts detected since power-on (wrapping)
    pub beat_count: u32,
}

/// Beat detection collaborator
///
/// The detector runs on its own sampling cadence; the monitor only polls
/// the latest status once per loop iteration.
pub trait BeatSource {
    /// Read the latest detector status
    fn status(&mut self) -> Result<BeatStatus, SensorError>;
}
