//! Monitor task
//!
//! Runs the control loop: boot the display, then poll the monitor and
//! sleep for whatever it asks. Any device error is fatal.

use defmt::*;
use embassy_time::Timer;

use pamoc_core::{Monitor, MonitorEvent};

use crate::adapters::BoardDevice;
use crate::channels::CANCEL_REQUEST;

/// Monitor task - owns the display, motor and serial adapters
#[embassy_executor::task]
pub async fn monitor_task(mut monitor: Monitor, mut device: BoardDevice) {
    info!("Monitor task started");

    if let Err(e) = monitor.boot(&mut device) {
        error!("Boot failed: {:?}", e);
        defmt::panic!("monitor boot failed");
    }

    loop {
        if CANCEL_REQUEST.signaled() {
            CANCEL_REQUEST.reset();
            if monitor.request_cancel() {
                info!("Cancel requested, stopping at next phase boundary");
            } else {
                debug!("Cancel ignored, no cancellable session running");
            }
        }

        let tick = match monitor.poll(&mut device) {
            Ok(tick) => tick,
            Err(e) => {
                error!("Device error: {:?}", e);
                defmt::panic!("monitor halted");
            }
        };

        for event in &tick.events {
            log_event(event);
        }

        Timer::after_millis(tick.wait_ms as u64).await;
    }
}

fn log_event(event: &MonitorEvent) {
    match event {
        MonitorEvent::Beat { bpm } => debug!("Beat: {} BPM", bpm),
        MonitorEvent::TextRelayed { len } => info!("Relayed {} bytes to display", len),
        MonitorEvent::SessionStarted { bpm } => {
            info!("Heart rate {} BPM over threshold, starting session", bpm)
        }
        MonitorEvent::PhaseEntered { phase, repetition } => {
            debug!("Breath {}: {:?}", repetition + 1, phase)
        }
        MonitorEvent::SessionFinished => info!("Breathing session finished"),
        MonitorEvent::SessionCancelled => warn!("Breathing session cancelled"),
    }
}
