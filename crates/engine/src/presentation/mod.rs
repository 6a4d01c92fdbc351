//! Presentation - rendering results as chat text.

pub mod format;

pub use format::ResponseFormatter;
