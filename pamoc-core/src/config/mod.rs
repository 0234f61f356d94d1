//! Configuration types
//!
//! Board-agnostic constants and the structures that bundle them. Nothing
//! here is mutable at runtime; a device is built from one `MonitorConfig`
//! and keeps it for its powered lifetime.

pub mod layout;
pub mod types;

pub use layout::*;
pub use types::*;
