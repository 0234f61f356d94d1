//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

#[cfg(feature = "cancel-button")]
pub mod button;
pub mod monitor;
pub mod sampler;
pub mod serial_rx;
pub mod serial_tx;

#[cfg(feature = "cancel-button")]
pub use button::cancel_button_task;
pub use monitor::monitor_task;
pub use sampler::sampler_task;
pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
