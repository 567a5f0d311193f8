//! Configuration system: compile-time constants and runtime settings

pub mod constants;
pub mod library;
pub mod settings;

pub use library::{Library, ValidRange};
pub use settings::{EnabledGroup, Settings};
