//! Output formatting for responses

pub mod console;
pub mod formatter;
