//! Character cell layout for the 8x2 status display

use crate::traits::Cell;

/// Display width in character cells
pub const DISPLAY_COLS: u8 = 8;

/// Display height in character cells
pub const DISPLAY_ROWS: u8 = 2;

/// Battery bar cells, filled right to left on the first row
///
/// The first `n` entries are drawn for an `n`-bar reading.
pub const BATTERY_BAR_CELLS: [Cell; 4] = [
    Cell::new(7, 0),
    Cell::new(6, 0),
    Cell::new(5, 0),
    Cell::new(4, 0),
];

/// Heart glyph cell (first column, second row)
pub const HEART_CELL: Cell = Cell::new(0, 1);

/// Where relayed serial text starts
pub const RELAY_CELL: Cell = Cell::new(1, 1);

/// Where breathing instructions are written
pub const LABEL_CELL: Cell = Cell::new(2, 1);

/// Greeting printed at power-on from the home position
pub const WELCOME_TEXT: &str = "Welcome!";
