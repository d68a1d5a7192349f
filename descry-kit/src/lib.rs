//! Textual input dialects for the `descry` conversion engine.

pub mod format;

pub use format::{Dialect, InputFile};
