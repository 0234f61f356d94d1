//! Cancel button task

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::CANCEL_REQUEST;

/// Contact bounce settle time (ms)
const DEBOUNCE_MS: u64 = 50;

/// Cancel button task - signals the monitor on each press
#[embassy_executor::task]
pub async fn cancel_button_task(mut button: Input<'static>) {
    info!("Cancel button task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        if button.is_low() {
            debug!("Cancel button pressed");
            CANCEL_REQUEST.signal(());
            button.wait_for_high().await;
        }
    }
}
