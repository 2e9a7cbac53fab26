//! Platform abstraction layer
//!
//! Input is sampled once per tick from the set of currently pressed keys;
//! the simulation only ever sees the resulting `TickInput` snapshot.

pub mod input;

pub use input::{Key, KeyBindings};
