//! Serial transmit task
//!
//! Writes queued lines (beat reports) to UART0.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::SERIAL_TX;

/// Serial TX task - drains the outbound line queue
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let line = SERIAL_TX.receive().await;

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send line: {:?}", e);
        } else {
            trace!("TX: {}", line.as_str());
        }
    }
}
