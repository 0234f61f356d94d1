//! HD44780 character LCD (4-bit parallel)
//!
//! Drives an HD44780-compatible controller over RS, E and D4-D7 with R/W
//! tied to ground. Nothing is read back from the controller, so every
//! command is followed by a fixed delay long enough for it to complete.
//!
//! # Bus Protocol
//!
//! Each byte is sent as two nibbles, high nibble first. A nibble is
//! latched on the falling edge of E. RS selects the instruction register
//! (low) or data register (high).

use embedded_hal::delay::DelayNs;
use pamoc_core::traits::{CharacterDisplay, DisplayError, GLYPH_ROWS};

use crate::gpio::OutputPin;

/// HD44780 instructions
pub mod cmd {
    /// Clear DDRAM and home the cursor
    pub const CLEAR_DISPLAY: u8 = 0x01;
    /// Home the cursor
    pub const RETURN_HOME: u8 = 0x02;
    /// Cursor move direction and display shift
    pub const ENTRY_MODE_SET: u8 = 0x04;
    /// Display, cursor and blink on/off
    pub const DISPLAY_CONTROL: u8 = 0x08;
    /// Interface width, line count and font
    pub const FUNCTION_SET: u8 = 0x20;
    /// Set CGRAM address (custom glyph memory)
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    /// Set DDRAM address (cursor position)
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// Instruction flags
pub mod flag {
    /// Entry mode: cursor moves right
    pub const ENTRY_LEFT: u8 = 0x02;
    /// Display control: display on
    pub const DISPLAY_ON: u8 = 0x04;
    /// Function set: two display lines
    pub const TWO_LINE: u8 = 0x08;
}

/// Number of custom glyph slots in CGRAM
pub const CGRAM_SLOTS: u8 = 8;

/// DDRAM start address of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Power-up wait before the first command (us)
const POWER_ON_US: u32 = 50_000;

/// Execution time of clear and home (us)
const SLOW_COMMAND_US: u32 = 2_000;

/// Execution time of every other instruction (us)
const COMMAND_US: u32 = 100;

/// LCD driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// Row beyond the configured line count
    InvalidRow,
    /// CGRAM slot above 7
    InvalidSlot,
}

impl From<LcdError> for DisplayError {
    fn from(e: LcdError) -> Self {
        match e {
            LcdError::InvalidRow => DisplayError::InvalidCoordinates,
            LcdError::InvalidSlot => DisplayError::InvalidGlyph,
        }
    }
}

/// HD44780 driver
///
/// All six bus pins share one pin type, which is what a HAL with a
/// type-erased output (such as `embassy_rp::gpio::Output`) provides.
pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    /// D4..D7
    data: [P; 4],
    delay: D,
    rows: u8,
    /// Last DISPLAY_CONTROL flags sent
    display_control: u8,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Create a driver without touching the bus
    ///
    /// Call [`init`](Self::init) before anything else.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D, rows: u8) -> Self {
        Self {
            rs,
            en,
            data,
            delay,
            rows: rows.clamp(1, ROW_OFFSETS.len() as u8),
            display_control: flag::DISPLAY_ON,
        }
    }

    /// Run the 4-bit power-on sequence and leave the display on and blank
    pub fn init(&mut self) {
        self.delay.delay_us(POWER_ON_US);
        self.rs.set_low();
        self.en.set_low();

        // Three 8-bit resets put the controller in a known state,
        // then switch to 4-bit mode.
        self.write_nibble(0x03);
        self.delay.delay_us(4_500);
        self.write_nibble(0x03);
        self.delay.delay_us(4_500);
        self.write_nibble(0x03);
        self.delay.delay_us(150);
        self.write_nibble(0x02);

        let lines = if self.rows > 1 { flag::TWO_LINE } else { 0 };
        self.command(cmd::FUNCTION_SET | lines);

        self.display_control = flag::DISPLAY_ON;
        self.command(cmd::DISPLAY_CONTROL | self.display_control);

        self.command(cmd::CLEAR_DISPLAY);
        self.delay.delay_us(SLOW_COMMAND_US);

        self.command(cmd::ENTRY_MODE_SET | flag::ENTRY_LEFT);
    }

    fn command(&mut self, value: u8) {
        self.send(value, false);
    }

    fn send(&mut self, value: u8, data: bool) {
        self.rs.set_level(data);
        self.write_nibble(value >> 4);
        self.write_nibble(value & 0x0F);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_level((nibble >> bit) & 1 == 1);
        }
        self.pulse_enable();
    }

    fn pulse_enable(&mut self) {
        self.en.set_low();
        self.delay.delay_us(1);
        self.en.set_high();
        self.delay.delay_us(1);
        self.en.set_low();
        self.delay.delay_us(COMMAND_US);
    }
}

impl<P: OutputPin, D: DelayNs> CharacterDisplay for Hd44780<P, D> {
    fn display_on(&mut self) -> Result<(), DisplayError> {
        self.display_control |= flag::DISPLAY_ON;
        self.command(cmd::DISPLAY_CONTROL | self.display_control);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR_DISPLAY);
        self.delay.delay_us(SLOW_COMMAND_US);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if row >= self.rows {
            return Err(LcdError::InvalidRow.into());
        }
        // Columns are not checked: DDRAM runs past the visible area
        let addr = ROW_OFFSETS[row as usize].wrapping_add(col);
        self.command(cmd::SET_DDRAM_ADDR | addr);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.send(byte, true);
        Ok(())
    }

    fn create_char(&mut self, id: u8, bitmap: &[u8; GLYPH_ROWS]) -> Result<(), DisplayError> {
        if id >= CGRAM_SLOTS {
            return Err(LcdError::InvalidSlot.into());
        }
        self.command(cmd::SET_CGRAM_ADDR | (id << 3));
        for row in bitmap {
            self.send(row & 0x1F, true);
        }
        // Eighth row is the cursor line, left blank
        self.send(0, true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pamoc_core::traits::Glyph;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    const RS: usize = 0;
    const EN: usize = 1;

    /// Shared bus model latching nibbles on the falling edge of E
    #[derive(Default)]
    struct Bus {
        levels: [bool; 6],
        nibbles: Vec<(bool, u8)>,
    }

    impl Bus {
        fn drive(&mut self, line: usize, high: bool) {
            let falling_enable = line == EN && self.levels[EN] && !high;
            self.levels[line] = high;
            if falling_enable {
                let nibble = (0..4).fold(0u8, |acc, bit| acc | ((self.levels[2 + bit] as u8) << bit));
                self.nibbles.push((self.levels[RS], nibble));
            }
        }
    }

    struct BusPin {
        line: usize,
        bus: Rc<RefCell<Bus>>,
    }

    impl OutputPin for BusPin {
        fn set_high(&mut self) {
            self.bus.borrow_mut().drive(self.line, true);
        }

        fn set_low(&mut self) {
            self.bus.borrow_mut().drive(self.line, false);
        }

        fn is_set_high(&self) -> bool {
            self.bus.borrow().levels[self.line]
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn lcd() -> (Hd44780<BusPin, CountingDelay>, Rc<RefCell<Bus>>) {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pin = |line| BusPin {
            line,
            bus: bus.clone(),
        };
        let lcd = Hd44780::new(
            pin(RS),
            pin(EN),
            [pin(2), pin(3), pin(4), pin(5)],
            CountingDelay::default(),
            2,
        );
        (lcd, bus)
    }

    /// Reassemble byte transfers, dropping any leading single nibbles
    fn take_bytes(bus: &Rc<RefCell<Bus>>, skip_nibbles: usize) -> Vec<(bool, u8)> {
        let nibbles: Vec<(bool, u8)> = bus.borrow_mut().nibbles.drain(..).skip(skip_nibbles).collect();
        nibbles
            .chunks(2)
            .map(|pair| (pair[0].0, (pair[0].1 << 4) | pair[1].1))
            .collect()
    }

    fn ready() -> (Hd44780<BusPin, CountingDelay>, Rc<RefCell<Bus>>) {
        let (mut lcd, bus) = lcd();
        lcd.init();
        bus.borrow_mut().nibbles.clear();
        (lcd, bus)
    }

    #[test]
    fn test_init_sequence() {
        let (mut lcd, bus) = lcd();
        lcd.init();

        let resets: Vec<u8> = bus.borrow().nibbles[..4].iter().map(|n| n.1).collect();
        assert_eq!(resets, [0x03, 0x03, 0x03, 0x02]);

        assert_eq!(
            take_bytes(&bus, 4),
            [(false, 0x28), (false, 0x0C), (false, 0x01), (false, 0x06)]
        );
        assert!(lcd.delay.total_ns >= 50_000_000);
    }

    #[test]
    fn test_set_cursor_addresses() {
        let (mut lcd, bus) = ready();

        lcd.set_cursor(7, 0).unwrap();
        lcd.set_cursor(1, 1).unwrap();
        lcd.set_cursor(2, 1).unwrap();

        assert_eq!(take_bytes(&bus, 0), [(false, 0x87), (false, 0xC1), (false, 0xC2)]);
    }

    #[test]
    fn test_set_cursor_rejects_row() {
        let (mut lcd, bus) = ready();

        assert_eq!(lcd.set_cursor(0, 2), Err(DisplayError::InvalidCoordinates));
        assert!(bus.borrow().nibbles.is_empty());
    }

    #[test]
    fn test_print_uses_data_register() {
        let (mut lcd, bus) = ready();

        lcd.print("OK").unwrap();
        assert_eq!(take_bytes(&bus, 0), [(true, b'O'), (true, b'K')]);
    }

    #[test]
    fn test_create_char() {
        let (mut lcd, bus) = ready();

        lcd.create_char(Glyph::Heart.id(), &Glyph::Heart.bitmap()).unwrap();
        let bytes = take_bytes(&bus, 0);

        assert_eq!(bytes[0], (false, 0x48));
        let rows: Vec<u8> = bytes[1..].iter().map(|b| b.1).collect();
        assert_eq!(rows, [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00, 0x00]);
        assert!(bytes[1..].iter().all(|b| b.0));
    }

    #[test]
    fn test_create_char_rejects_slot() {
        let (mut lcd, _bus) = ready();
        assert_eq!(
            lcd.create_char(CGRAM_SLOTS, &Glyph::Bar.bitmap()),
            Err(DisplayError::InvalidGlyph)
        );
    }

    #[test]
    fn test_display_on() {
        let (mut lcd, bus) = ready();

        lcd.display_on().unwrap();
        assert_eq!(take_bytes(&bus, 0), [(false, 0x0C)]);
    }

    #[test]
    fn test_clear() {
        let (mut lcd, bus) = ready();

        lcd.clear().unwrap();
        assert_eq!(take_bytes(&bus, 0), [(false, 0x01)]);
    }
}
