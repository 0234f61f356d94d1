//! Character display traits
//!
//! The status display is an 8x2 character LCD with two user-defined glyphs.
//! All writes are absolute-position and last-write-wins; nothing is diffed
//! or cleared unless asked for.

/// Number of pixel rows in a custom glyph bitmap
pub const GLYPH_ROWS: usize = 7;

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus or pin write failed
    Communication,
    /// Cell outside the visible grid
    InvalidCoordinates,
    /// Glyph slot out of range
    InvalidGlyph,
}

/// Logical character cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    /// Column (0-based)
    pub col: u8,
    /// Row (0-based)
    pub row: u8,
}

impl Cell {
    /// Create a cell address
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

/// User-defined glyphs loaded into display memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// Solid block used for battery bars
    Bar = 0,
    /// Heart icon shown next to relayed text
    Heart = 1,
}

impl Glyph {
    /// All glyphs, in slot order
    pub const ALL: [Glyph; 2] = [Glyph::Bar, Glyph::Heart];

    /// Display memory slot (character code) for this glyph
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// 5x7 bitmap, one byte per row, low 5 bits significant
    pub const fn bitmap(self) -> [u8; GLYPH_ROWS] {
        match self {
            Glyph::Bar => [0b11111; GLYPH_ROWS],
            Glyph::Heart => [
                0b00000, 0b01010, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000,
            ],
        }
    }
}

/// Trait for character display drivers
///
/// Mirrors the primitives of an HD44780-class controller. Text that runs
/// past the last column is handled by the controller; this layer neither
/// wraps nor truncates.
pub trait CharacterDisplay {
    /// Turn the display output on (contents are preserved while off)
    fn display_on(&mut self) -> Result<(), DisplayError>;

    /// Clear the display and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor to a cell
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Write one character code at the cursor and advance it
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError>;

    /// Load a custom glyph bitmap into slot `id` (0-7)
    fn create_char(&mut self, id: u8, bitmap: &[u8; GLYPH_ROWS]) -> Result<(), DisplayError>;

    /// Write text at the cursor
    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        for byte in text.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// Cell-addressed helpers used by the monitor
pub trait DisplaySink: CharacterDisplay {
    /// Draw a glyph at a cell
    fn write_glyph_at(&mut self, cell: Cell, glyph: Glyph) -> Result<(), DisplayError> {
        self.set_cursor(cell.col, cell.row)?;
        self.write_byte(glyph.id())
    }

    /// Draw text starting at a cell
    fn write_text_at(&mut self, cell: Cell, text: &str) -> Result<(), DisplayError> {
        self.set_cursor(cell.col, cell.row)?;
        self.print(text)
    }

    /// Blank `len` cells starting at `cell`
    fn clear_region(&mut self, cell: Cell, len: u8) -> Result<(), DisplayError> {
        self.set_cursor(cell.col, cell.row)?;
        for _ in 0..len {
            self.write_byte(b' ')?;
        }
        Ok(())
    }

    /// Register every [`Glyph`] with the controller
    fn load_glyphs(&mut self) -> Result<(), DisplayError> {
        for glyph in Glyph::ALL {
            self.create_char(glyph.id(), &glyph.bitmap())?;
        }
        Ok(())
    }
}

// Blanket implementation for all CharacterDisplay types
impl<T: CharacterDisplay> DisplaySink for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_ids() {
        assert_eq!(Glyph::Bar.id(), 0);
        assert_eq!(Glyph::Heart.id(), 1);
    }

    #[test]
    fn test_glyph_bitmaps_use_five_bits() {
        for glyph in Glyph::ALL {
            for row in glyph.bitmap() {
                assert_eq!(row & !0b11111, 0);
            }
        }
    }

    #[test]
    fn test_heart_shape() {
        assert_eq!(
            Glyph::Heart.bitmap(),
            [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00]
        );
    }

    /// Records the calls a sink makes
    #[derive(Default)]
    struct Recorder {
        cursor: Option<(u8, u8)>,
        bytes: std::vec::Vec<u8>,
        glyphs: std::vec::Vec<(u8, [u8; GLYPH_ROWS])>,
    }

    impl CharacterDisplay for Recorder {
        fn display_on(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            self.bytes.clear();
            Ok(())
        }

        fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
            self.cursor = Some((col, row));
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
            self.bytes.push(byte);
            Ok(())
        }

        fn create_char(&mut self, id: u8, bitmap: &[u8; GLYPH_ROWS]) -> Result<(), DisplayError> {
            self.glyphs.push((id, *bitmap));
            Ok(())
        }
    }

    #[test]
    fn test_sink_helpers() {
        let mut lcd = Recorder::default();

        lcd.write_glyph_at(Cell::new(0, 1), Glyph::Heart).unwrap();
        assert_eq!(lcd.cursor, Some((0, 1)));
        assert_eq!(lcd.bytes, [1]);

        lcd.write_text_at(Cell::new(2, 1), "Hold").unwrap();
        assert_eq!(lcd.cursor, Some((2, 1)));
        assert_eq!(&lcd.bytes[1..], b"Hold");

        lcd.clear_region(Cell::new(4, 0), 3).unwrap();
        assert_eq!(lcd.cursor, Some((4, 0)));
        assert_eq!(&lcd.bytes[5..], b"   ");
    }

    #[test]
    fn test_load_glyphs_in_slot_order() {
        let mut lcd = Recorder::default();
        lcd.load_glyphs().unwrap();

        assert_eq!(
            lcd.glyphs,
            [
                (0, Glyph::Bar.bitmap()),
                (1, Glyph::Heart.bitmap())
            ]
        );
    }
}
