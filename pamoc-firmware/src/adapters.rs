//! Glue between the embassy statics and the core traits
//!
//! The monitor runs synchronously between awaits, so every adapter here
//! only reads what the background tasks have already published.

use core::sync::atomic::Ordering;

use embassy_rp::gpio::Output;
use embassy_time::Delay;

use pamoc_core::traits::{BeatSource, BeatStatus, SensorError, SerialError, SerialPort};
use pamoc_core::Device;
use pamoc_drivers::gpio::HalPin;
use pamoc_drivers::haptic::GpioMotor;
use pamoc_drivers::lcd::Hd44780;
use pamoc_drivers::sensor::{AdcReader, ScaledAdc};

use crate::channels::{TxLine, BATTERY_CODE, BATTERY_UNREAD, BEAT_STATUS, SERIAL_RX, SERIAL_TX};

/// GPIO output as seen by the drivers
pub type Pin = HalPin<Output<'static>>;

/// Status LCD on this board
pub type Lcd = Hd44780<Pin, Delay>;

/// Peripherals handed to the monitor task
pub type BoardDevice = Device<Lcd, ScaledAdc<LatestBatteryCode>, SharedBeats, ChannelSerial, GpioMotor<Pin>>;

/// Beat detector status published by the sampler task
pub struct SharedBeats;

impl BeatSource for SharedBeats {
    fn status(&mut self) -> Result<BeatStatus, SensorError> {
        Ok(BEAT_STATUS.lock(|status| status.get()))
    }
}

/// Last battery code taken by the sampler task
pub struct LatestBatteryCode;

impl AdcReader for LatestBatteryCode {
    fn read(&mut self) -> Result<u16, SensorError> {
        match BATTERY_CODE.load(Ordering::Relaxed) {
            BATTERY_UNREAD => Err(SensorError::Unavailable),
            code => Ok(code),
        }
    }
}

/// Serial link backed by the UART task channels
pub struct ChannelSerial;

impl SerialPort for ChannelSerial {
    fn available(&mut self) -> bool {
        !SERIAL_RX.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        SERIAL_RX.try_receive().ok()
    }

    fn write_str(&mut self, text: &str) -> Result<(), SerialError> {
        let line = TxLine::try_from(text).map_err(|_| SerialError::BufferOverflow)?;
        SERIAL_TX.try_send(line).map_err(|_| SerialError::BufferOverflow)
    }
}
