//! Photoplethysmograph beat detector
//!
//! Finds heartbeats in the raw signal of an optical pulse sensor sampled
//! at a fixed rate (nominally every 2 ms).
//!
//! # Algorithm
//!
//! - The threshold adapts to the signal: each time a pulse ends it is moved
//!   to the midpoint of the last peak and trough.
//! - A beat starts when the signal rises above the threshold, at least
//!   250 ms and 3/5 of the last inter-beat interval (IBI) after the
//!   previous one.
//! - The first beat after a reset only arms the detector. The second seeds
//!   the IBI history, so a rate is known from the second beat on.
//! - BPM is 60 000 divided by the mean of the last ten IBIs.
//! - After 2.5 s without a beat everything resets and BPM reads 0.

use pamoc_core::traits::{BeatSource, BeatStatus, SensorError};

/// Nominal sample period (ms)
pub const SAMPLE_PERIOD_MS: u32 = 2;

/// Number of IBIs averaged for the rate
pub const IBI_HISTORY: usize = 10;

/// Mid-scale of a 10-bit signal, starting point for peak and trough
pub const MID_SCALE: u16 = 512;

/// Shortest accepted IBI (ms), caps the rate at 240 BPM
pub const MIN_IBI_MS: u32 = 250;

/// Silence after which the detector resets (ms)
pub const SILENCE_RESET_MS: u32 = 2500;

/// IBI assumed after a reset (ms)
pub const DEFAULT_IBI_MS: u32 = 600;

const DEFAULT_AMPLITUDE: u16 = 100;

/// Adaptive-threshold beat detector
#[derive(Debug, Clone)]
pub struct BeatDetector {
    /// Threshold restored on reset
    threshold_setting: u16,
    threshold: u16,
    peak: u16,
    trough: u16,
    amplitude: u16,
    /// Last inter-beat interval (ms)
    ibi_ms: u32,
    /// Timestamp of the last beat start (ms)
    last_beat_ms: u32,
    /// Signal is above threshold within a beat
    in_pulse: bool,
    first_beat: bool,
    second_beat: bool,
    history: [u32; IBI_HISTORY],
    bpm: u16,
    beat_count: u32,
}

impl BeatDetector {
    /// Create a detector
    ///
    /// `threshold` is the initial amplitude threshold in 10-bit counts.
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold_setting: threshold,
            threshold,
            peak: MID_SCALE,
            trough: MID_SCALE,
            amplitude: DEFAULT_AMPLITUDE,
            ibi_ms: DEFAULT_IBI_MS,
            last_beat_ms: 0,
            in_pulse: false,
            first_beat: true,
            second_beat: false,
            history: [0; IBI_HISTORY],
            bpm: 0,
            beat_count: 0,
        }
    }

    /// Latest rate, 0 until two beats have been seen
    pub fn beats_per_minute(&self) -> u16 {
        self.bpm
    }

    /// Measured beats since power-on (wrapping)
    pub fn beat_count(&self) -> u32 {
        self.beat_count
    }

    /// Last inter-beat interval (ms)
    pub fn ibi_ms(&self) -> u32 {
        self.ibi_ms
    }

    /// Current adaptive threshold
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// Last peak-to-trough amplitude
    pub fn amplitude(&self) -> u16 {
        self.amplitude
    }

    /// Check if the signal is currently inside a beat
    pub fn in_pulse(&self) -> bool {
        self.in_pulse
    }

    /// Feed one 10-bit sample taken at `now_ms`
    ///
    /// Returns true if this sample started a measured beat.
    pub fn process(&mut self, signal: u16, now_ms: u32) -> bool {
        let since_beat = now_ms.wrapping_sub(self.last_beat_ms);
        let refractory = (self.ibi_ms / 5) * 3;

        // Trough only after the dicrotic notch has passed
        if signal < self.threshold && since_beat > refractory && signal < self.trough {
            self.trough = signal;
        }
        if signal > self.threshold && signal > self.peak {
            self.peak = signal;
        }

        let mut measured = false;
        if since_beat > MIN_IBI_MS
            && signal > self.threshold
            && !self.in_pulse
            && since_beat > refractory
        {
            self.in_pulse = true;
            self.ibi_ms = since_beat;
            self.last_beat_ms = now_ms;

            if self.second_beat {
                self.second_beat = false;
                self.history = [self.ibi_ms; IBI_HISTORY];
            }

            if self.first_beat {
                // No previous beat, so this IBI means nothing yet
                self.first_beat = false;
                self.second_beat = true;
                return false;
            }

            self.history.rotate_left(1);
            self.history[IBI_HISTORY - 1] = self.ibi_ms;
            let mean = self.history.iter().sum::<u32>() / IBI_HISTORY as u32;
            self.bpm = (60_000 / mean.max(1)).min(u16::MAX as u32) as u16;
            self.beat_count = self.beat_count.wrapping_add(1);
            measured = true;
        }

        if signal < self.threshold && self.in_pulse {
            self.in_pulse = false;
            self.amplitude = self.peak.saturating_sub(self.trough);
            self.threshold = self.amplitude / 2 + self.trough;
            self.peak = self.threshold;
            self.trough = self.threshold;
        }

        if since_beat > SILENCE_RESET_MS {
            self.reset(now_ms);
        }

        measured
    }

    /// Forget the current rhythm
    ///
    /// The beat counter is kept so consumers never see it run backwards.
    pub fn reset(&mut self, now_ms: u32) {
        let beat_count = self.beat_count;
        *self = Self::new(self.threshold_setting);
        self.last_beat_ms = now_ms;
        self.beat_count = beat_count;
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new(pamoc_core::config::PULSE_AMPLITUDE_THRESHOLD)
    }
}

impl BeatSource for BeatDetector {
    fn status(&mut self) -> Result<BeatStatus, SensorError> {
        Ok(BeatStatus {
            beats_per_minute: self.bpm,
            beat_count: self.beat_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HIGH: u16 = 600;
    const LOW: u16 = 50;
    const PULSE_WIDTH_MS: u32 = 100;

    /// Square wave: HIGH for the first 100 ms of every period
    fn wave(t: u32, period: u32) -> u16 {
        if t % period < PULSE_WIDTH_MS {
            HIGH
        } else {
            LOW
        }
    }

    /// Feed samples for `from..to` and return the number of measured beats
    fn feed(det: &mut BeatDetector, from: u32, to: u32, signal: impl Fn(u32) -> u16) -> u32 {
        let mut beats = 0;
        let mut t = from;
        while t < to {
            if det.process(signal(t), t) {
                beats += 1;
            }
            t += SAMPLE_PERIOD_MS;
        }
        beats
    }

    #[test]
    fn test_zero_before_any_beat() {
        let mut det = BeatDetector::new(120);
        feed(&mut det, 0, 200, |_| LOW);

        assert_eq!(det.beats_per_minute(), 0);
        assert_eq!(det.status().unwrap(), BeatStatus::default());
    }

    #[test]
    fn test_first_beat_only_arms() {
        let mut det = BeatDetector::new(120);

        // Up to and including the first rising edge after 250 ms
        feed(&mut det, 0, 752, |t| wave(t, 750));

        assert!(det.in_pulse());
        assert_eq!(det.beats_per_minute(), 0);
        assert_eq!(det.beat_count(), 0);
    }

    #[test]
    fn test_periodic_signal_rate() {
        let mut det = BeatDetector::new(120);

        let beats = feed(&mut det, 0, 1502, |t| wave(t, 750));
        assert_eq!(beats, 1);
        assert_eq!(det.beats_per_minute(), 80);
        assert_eq!(det.ibi_ms(), 750);

        let beats = feed(&mut det, 1502, 1502 + 750 * 8, |t| wave(t, 750));
        assert_eq!(beats, 8);
        assert_eq!(det.beats_per_minute(), 80);
        assert_eq!(det.beat_count(), 9);
    }

    #[test]
    fn test_threshold_adapts_to_midpoint() {
        let mut det = BeatDetector::new(120);
        feed(&mut det, 0, 2000, |t| wave(t, 750));

        // Midpoint of 600 and 50
        assert_eq!(det.threshold(), 325);
        assert_eq!(det.amplitude(), 550);
    }

    #[test]
    fn test_rate_change_averages_in() {
        let mut det = BeatDetector::new(120);
        feed(&mut det, 0, 1502, |t| wave(t, 750));

        // One beat 500 ms later: mean of nine 750s and one 500
        feed(&mut det, 1502, 2002, |t| if t == 2000 { HIGH } else { LOW });
        assert_eq!(det.ibi_ms(), 500);
        assert_eq!(det.beats_per_minute(), (60_000 / 725) as u16);
    }

    #[test]
    fn test_silence_resets() {
        let mut det = BeatDetector::new(120);
        feed(&mut det, 0, 3000, |t| wave(t, 750));
        let count = det.beat_count();
        assert!(det.beats_per_minute() > 0);

        feed(&mut det, 3000, 6000, |_| LOW);

        assert_eq!(det.beats_per_minute(), 0);
        assert_eq!(det.threshold(), 120);
        assert_eq!(det.ibi_ms(), DEFAULT_IBI_MS);
        assert_eq!(det.beat_count(), count);
    }

    #[test]
    fn test_fast_edges_rejected() {
        let mut det = BeatDetector::new(120);
        feed(&mut det, 0, 1502, |t| wave(t, 750));
        let count = det.beat_count();

        // A second rising edge 200 ms after the beat is inside the
        // minimum interval
        feed(&mut det, 1502, 1702, |t| wave(t - 1500, 200));
        assert_eq!(det.beat_count(), count);
    }

    proptest! {
        #[test]
        fn prop_steady_rhythm(half_period in 200u32..750) {
            let period = half_period * 2;
            let mut det = BeatDetector::new(120);
            feed(&mut det, 0, period * 6 + SAMPLE_PERIOD_MS, |t| wave(t, period));

            prop_assert_eq!(det.ibi_ms(), period);
            prop_assert_eq!(det.beats_per_minute() as u32, 60_000 / period);
            prop_assert_eq!(det.beat_count(), 5);
        }
    }
}
