//! Serial receive task
//!
//! Moves bytes from UART0 into the receive channel. The monitor drains
//! that channel when it relays text to the display.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::SERIAL_RX;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Serial RX task - forwards received bytes to the monitor
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    // Drop bytes while the monitor is busy and the channel is full
                    if SERIAL_RX.try_send(byte).is_err() {
                        warn!("Serial RX channel full, dropping byte");
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
