//! P.A.Mo.C. - Panic Attack Monitor and Control firmware
//!
//! Main firmware binary for an RP2040 wearable. A pulse sensor watches
//! the heart rate; when it runs above threshold a vibration motor paces
//! the wearer through ten slow breaths while an 8x2 LCD shows the battery
//! gauge, relayed serial text and the current instruction.

#![no_std]
#![no_main]

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::Peri;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pamoc_core::{Device, Monitor};
use pamoc_drivers::gpio::HalPin;
use pamoc_drivers::haptic::GpioMotor;
use pamoc_drivers::lcd::Hd44780;
use pamoc_drivers::sensor::ScaledAdc;

use crate::adapters::{ChannelSerial, LatestBatteryCode, Pin, SharedBeats};
use crate::board::{ADC_NATIVE_BITS, LCD_ROWS, SERIAL_BAUD, SIGNAL_BITS};
use crate::channels::BATTERY_CODE;

mod adapters;
mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("P.A.Mo.C. firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = board::monitor_config();

    // Serial text link
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = SERIAL_BAUD;
        cfg
    };

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", SERIAL_BAUD);

    // Pulse sensor and battery share the ADC
    let mut adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let pulse_channel = Channel::new_pin(p.PIN_26, Pull::None);
    let mut battery_channel = Channel::new_pin(p.PIN_29, Pull::None);

    // First battery code before the monitor's first iteration
    match adc.read(&mut battery_channel).await {
        Ok(raw) => {
            BATTERY_CODE.store(raw, Ordering::Relaxed);
            info!("ADC initialized, battery code {}", raw);
        }
        Err(e) => warn!("Initial battery read failed: {:?}", e),
    }

    // Character LCD, 4-bit bus
    let mut lcd = Hd44780::new(
        output(p.PIN_16),
        output(p.PIN_17),
        [
            output(p.PIN_18),
            output(p.PIN_19),
            output(p.PIN_20),
            output(p.PIN_21),
        ],
        Delay,
        LCD_ROWS,
    );
    lcd.init();

    info!("LCD initialized");

    let motor = GpioMotor::new_active_high(output(p.PIN_15));

    let device = match Device::new(
        lcd,
        ScaledAdc::new(LatestBatteryCode, ADC_NATIVE_BITS, SIGNAL_BITS),
        SharedBeats,
        ChannelSerial,
        motor,
        &config,
    ) {
        Ok(device) => device,
        Err(e) => {
            error!("Device setup failed: {:?}", e);
            defmt::panic!("device setup failed");
        }
    };
    let monitor = Monitor::new(config);

    info!(
        "Session policy: {:?}, threshold {} BPM, {} ms per session",
        config.session_policy,
        config.threshold_bpm,
        config.breathing.session_ms()
    );

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::sampler_task(adc, pulse_channel, battery_channel))
        .unwrap();
    spawner.spawn(tasks::monitor_task(monitor, device)).unwrap();

    #[cfg(feature = "cancel-button")]
    {
        let button = embassy_rp::gpio::Input::new(p.PIN_14, Pull::Up);
        spawner.spawn(tasks::cancel_button_task(button)).unwrap();
    }

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Push-pull output starting low
fn output(pin: Peri<'static, impl embassy_rp::gpio::Pin>) -> Pin {
    HalPin::new(Output::new(pin, Level::Low))
}
