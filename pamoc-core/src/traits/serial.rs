//! Serial text channel trait

/// Errors that can occur on the serial channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Transmit buffer full
    BufferOverflow,
}

/// Byte-oriented serial port
///
/// Reads never block: the caller checks `available` and drains what has
/// already been buffered.
pub trait SerialPort {
    /// Check if at least one received byte is buffered
    fn available(&mut self) -> bool;

    /// Take the next buffered byte, if any
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue text for transmission
    fn write_str(&mut self, text: &str) -> Result<(), SerialError>;
}
