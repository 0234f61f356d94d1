//! Inter-task communication channels
//!
//! Defines the statics shared between Embassy tasks. The monitor task
//! never awaits on these; it only takes what is already there.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::String;
use portable_atomic::AtomicU16;

use pamoc_core::traits::BeatStatus;

/// Capacity for received serial bytes
pub const SERIAL_RX_SIZE: usize = 64;

/// Queued outbound lines
pub const SERIAL_TX_SIZE: usize = 4;

/// Longest outbound line
pub const TX_LINE_LEN: usize = 32;

/// One outbound serial line
pub type TxLine = String<TX_LINE_LEN>;

/// Bytes received on UART0, oldest first
pub static SERIAL_RX: Channel<CriticalSectionRawMutex, u8, SERIAL_RX_SIZE> = Channel::new();

/// Lines waiting to be written to UART0
pub static SERIAL_TX: Channel<CriticalSectionRawMutex, TxLine, SERIAL_TX_SIZE> = Channel::new();

/// Latest beat detector status (updated by the sampler task)
pub static BEAT_STATUS: Mutex<CriticalSectionRawMutex, Cell<BeatStatus>> =
    Mutex::new(Cell::new(BeatStatus {
        beats_per_minute: 0,
        beat_count: 0,
    }));

/// Battery code before the first conversion lands (above any 12-bit code)
pub const BATTERY_UNREAD: u16 = u16::MAX;

/// Latest battery ADC code at native resolution (updated by the sampler task)
pub static BATTERY_CODE: AtomicU16 = AtomicU16::new(BATTERY_UNREAD);

/// Cancel button pressed
pub static CANCEL_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();
