//! Board definition: Raspberry Pi Pico
//!
//! Pin assignments (all 3.3 V logic):
//!
//! | Function        | GPIO | Notes                              |
//! |-----------------|------|------------------------------------|
//! | UART0 TX / RX   | 0, 1 | serial text link, 9600 baud        |
//! | Cancel button   | 14   | to ground, internal pull-up        |
//! | Motor           | 15   | NPN low-side switch, active high   |
//! | LCD RS / E      | 16, 17 | R/W tied to ground               |
//! | LCD D4..D7      | 18-21 |                                   |
//! | Pulse sensor    | 26   | ADC0                               |
//! | Battery         | 29   | ADC3, VSYS through the 1:3 divider |

use pamoc_core::config::{MonitorConfig, SessionPolicy, VoltageScale};

/// Serial link baud rate
pub const SERIAL_BAUD: u32 = 9600;

/// Native resolution of the RP2040 ADC
pub const ADC_NATIVE_BITS: u8 = 12;

/// Resolution the monitor and beat detector work in
pub const SIGNAL_BITS: u8 = 10;

/// LCD line count
pub const LCD_ROWS: u8 = 2;

/// Pulse sensor sample period (ms)
pub const PULSE_SAMPLE_MS: u64 = 2;

/// Battery sample period, in pulse samples
pub const BATTERY_EVERY_SAMPLES: u32 = 50;

/// Battery conversion on this board
///
/// 10-bit codes against the 3.3 V rail, VSYS divided by three on the Pico.
pub const VOLTAGE_SCALE: VoltageScale = VoltageScale {
    full_scale: 1023,
    reference_v: 3.3,
    divider_ratio: 3.0,
};

/// Monitor configuration for this board
pub fn monitor_config() -> MonitorConfig {
    MonitorConfig {
        voltage_scale: VOLTAGE_SCALE,
        session_policy: if cfg!(feature = "cancel-button") {
            SessionPolicy::Cancellable
        } else {
            SessionPolicy::RunToCompletion
        },
        ..MonitorConfig::default()
    }
}
