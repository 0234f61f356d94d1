//! Pulse monitor
//!
//! Turns the beat detector's running counter into a one-shot edge signal.
//! The edge is derived from the counter rather than from a level, so a
//! beat is reported on exactly one poll no matter how often the monitor
//! polls between beats.

use crate::traits::{BeatSource, SensorError};

/// Result of one pulse poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseReading {
    /// Latest estimate, 0 before the first measured beat
    pub beats_per_minute: u16,
    /// True only on the poll that first sees a new beat
    pub beat_edge: bool,
}

/// Pulse monitor wrapping a beat detector
pub struct PulseMonitor<S> {
    source: S,
    /// Counter value observed on the previous poll
    last_beat_count: u32,
}

impl<S: BeatSource> PulseMonitor<S> {
    /// Create a monitor
    ///
    /// The first poll only reports an edge for beats detected after this
    /// call's snapshot of the counter, so the source must be readable here.
    pub fn new(mut source: S) -> Result<Self, SensorError> {
        let last_beat_count = source.status()?.beat_count;
        Ok(Self {
            source,
            last_beat_count,
        })
    }

    /// Poll the detector
    pub fn poll(&mut self) -> Result<PulseReading, SensorError> {
        let status = self.source.status()?;

        let beat_edge = status.beat_count != self.last_beat_count;
        self.last_beat_count = status.beat_count;

        Ok(PulseReading {
            beats_per_minute: status.beats_per_minute,
            beat_edge,
        })
    }

    /// Access the wrapped detector
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
