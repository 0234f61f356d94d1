//! Analog sampler task
//!
//! Samples the pulse sensor every 2 ms and feeds the beat detector, and
//! refreshes the battery code every 100 ms. This is the only task that
//! touches the ADC.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Instant, Ticker};

use pamoc_core::config::PULSE_AMPLITUDE_THRESHOLD;
use pamoc_core::traits::BeatSource;
use pamoc_drivers::pulse::BeatDetector;
use pamoc_drivers::sensor::downscale;

use crate::board::{ADC_NATIVE_BITS, BATTERY_EVERY_SAMPLES, PULSE_SAMPLE_MS, SIGNAL_BITS};
use crate::channels::{BATTERY_CODE, BEAT_STATUS};

/// Sampler task - owns the ADC and the beat detector
#[embassy_executor::task]
pub async fn sampler_task(
    mut adc: Adc<'static, Async>,
    mut pulse_channel: Channel<'static>,
    mut battery_channel: Channel<'static>,
) {
    info!("Sampler task started");

    let mut detector = BeatDetector::new(PULSE_AMPLITUDE_THRESHOLD);
    let mut ticker = Ticker::every(Duration::from_millis(PULSE_SAMPLE_MS));
    let start = Instant::now();
    let mut samples: u32 = 0;

    loop {
        ticker.next().await;
        let now_ms = start.elapsed().as_millis() as u32;

        match adc.read(&mut pulse_channel).await {
            Ok(raw) => {
                let signal = downscale(raw, ADC_NATIVE_BITS, SIGNAL_BITS);
                if detector.process(signal, now_ms) {
                    trace!(
                        "Beat: {} BPM (IBI {} ms)",
                        detector.beats_per_minute(),
                        detector.ibi_ms()
                    );
                }
                // Publish every sample so a reset to 0 BPM is seen too
                if let Ok(status) = detector.status() {
                    BEAT_STATUS.lock(|s| s.set(status));
                }
            }
            Err(e) => {
                warn!("Pulse ADC read failed: {:?}", e);
            }
        }

        if samples % BATTERY_EVERY_SAMPLES == 0 {
            match adc.read(&mut battery_channel).await {
                Ok(raw) => BATTERY_CODE.store(raw, Ordering::Relaxed),
                Err(e) => warn!("Battery ADC read failed: {:?}", e),
            }
        }
        samples = samples.wrapping_add(1);
    }
}
