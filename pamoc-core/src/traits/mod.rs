//! Hardware abstraction traits
//!
//! These traits define the interface between the monitor logic and
//! board-specific implementations. Every peripheral the control loop touches
//! sits behind one of them so the loop can run against mocks on the host.

pub mod actuator;
pub mod display;
pub mod sensor;
pub mod serial;

pub use actuator::Actuator;
pub use display::{Cell, CharacterDisplay, DisplayError, DisplaySink, Glyph, GLYPH_ROWS};
pub use sensor::{AnalogInput, BeatSource, BeatStatus, SensorError};
pub use serial::{SerialError, SerialPort};
